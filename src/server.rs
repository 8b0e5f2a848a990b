//! Localhost JSON bridge between a view and the controller.
//!
//! Every mutating route answers with the fresh [`AppSnapshot`] so the view
//! can re-render from it.
//!
//! [`AppSnapshot`]: crate::controller::AppSnapshot

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::Filter;

use crate::analysis::{self, Pacing};
use crate::catalog::{self, Category};
use crate::controller::{lock, NotificationPermission, Permission, SharedController};
use crate::error::ActionError;
use crate::identify::IdentificationService;
use crate::image::CapturedImage;
use crate::models::Language;

#[derive(Clone)]
pub struct AppContext {
    pub controller: SharedController,
    pub identifier: Arc<IdentificationService>,
    pub pacing: Pacing,
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    image: String,
}

#[derive(Debug, Deserialize)]
struct ReminderRequest {
    permission: Permission,
}

#[derive(Debug, Deserialize)]
struct LanguageRequest {
    language: Language,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    category: Option<Category>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Permission state the view already resolved with the platform.
struct ReportedPermission(Permission);

impl NotificationPermission for ReportedPermission {
    fn status(&self) -> Permission {
        self.0
    }

    fn request(&self) -> Permission {
        self.0
    }
}

type Reply = WithStatus<Json>;

fn ok<T: Serialize>(body: &T) -> Reply {
    warp::reply::with_status(warp::reply::json(body), StatusCode::OK)
}

fn fail(error: impl ToString, status: StatusCode) -> Reply {
    let body = ErrorBody {
        error: error.to_string(),
    };
    warp::reply::with_status(warp::reply::json(&body), status)
}

fn action_status(error: &ActionError) -> StatusCode {
    match error {
        ActionError::PlantNotFound(_) | ActionError::CatalogIndex(_) => StatusCode::NOT_FOUND,
        ActionError::NothingPending | ActionError::AnalysisRunning | ActionError::ScannerClosed => {
            StatusCode::CONFLICT
        }
    }
}

fn snapshot(controller: &SharedController) -> Reply {
    ok(&lock(controller).snapshot())
}

fn with_context(
    ctx: AppContext,
) -> impl Filter<Extract = (AppContext,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

pub fn routes(
    ctx: AppContext,
) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
    let state = warp::get()
        .and(warp::path("state"))
        .and(warp::path::end())
        .and(with_context(ctx.clone()))
        .map(|ctx: AppContext| snapshot(&ctx.controller));

    let scanner_open = warp::post()
        .and(warp::path!("scanner" / "open"))
        .and(with_context(ctx.clone()))
        .map(|ctx: AppContext| {
            lock(&ctx.controller).open_scanner();
            snapshot(&ctx.controller)
        });

    let scanner_close = warp::post()
        .and(warp::path!("scanner" / "close"))
        .and(with_context(ctx.clone()))
        .map(|ctx: AppContext| {
            lock(&ctx.controller).close_scanner();
            snapshot(&ctx.controller)
        });

    let scan = warp::post()
        .and(warp::path("scan"))
        .and(warp::path::end())
        .and(warp::body::json::<ScanRequest>())
        .and(with_context(ctx.clone()))
        .map(|request: ScanRequest, ctx: AppContext| {
            let image = match CapturedImage::from_data_uri(&request.image) {
                Ok(image) => image,
                Err(e) => return fail(e, StatusCode::BAD_REQUEST),
            };
            match analysis::start(&ctx.controller, Arc::clone(&ctx.identifier), image, ctx.pacing) {
                Ok(_) => warp::reply::with_status(
                    warp::reply::json(&lock(&ctx.controller).snapshot()),
                    StatusCode::ACCEPTED,
                ),
                Err(e) => fail(&e, action_status(&e)),
            }
        });

    let save = warp::post()
        .and(warp::path!("scan" / "save"))
        .and(with_context(ctx.clone()))
        .map(|ctx: AppContext| {
            let saved = lock(&ctx.controller).save_pending();
            match saved {
                Ok(_) => snapshot(&ctx.controller),
                Err(e) => fail(&e, action_status(&e)),
            }
        });

    let search = warp::get()
        .and(warp::path("plants"))
        .and(warp::path::end())
        .and(warp::query::<SearchQuery>())
        .and(with_context(ctx.clone()))
        .map(|query: SearchQuery, ctx: AppContext| {
            let controller = lock(&ctx.controller);
            ok(&controller.search(&query.q))
        });

    let select = warp::post()
        .and(warp::path!("plants" / String / "select"))
        .and(with_context(ctx.clone()))
        .map(|id: String, ctx: AppContext| {
            let selected = lock(&ctx.controller).select_plant(&id);
            match selected {
                Ok(()) => snapshot(&ctx.controller),
                Err(e) => fail(&e, action_status(&e)),
            }
        });

    let close_detail = warp::post()
        .and(warp::path!("detail" / "close"))
        .and(with_context(ctx.clone()))
        .map(|ctx: AppContext| {
            lock(&ctx.controller).close_detail();
            snapshot(&ctx.controller)
        });

    let water = warp::post()
        .and(warp::path!("plants" / String / "water"))
        .and(with_context(ctx.clone()))
        .map(|id: String, ctx: AppContext| {
            let watered = lock(&ctx.controller).water(&id);
            match watered {
                Ok(_) => snapshot(&ctx.controller),
                Err(e) => fail(&e, action_status(&e)),
            }
        });

    let delete = warp::delete()
        .and(warp::path!("plants" / String))
        .and(with_context(ctx.clone()))
        .map(|id: String, ctx: AppContext| {
            lock(&ctx.controller).delete(&id);
            snapshot(&ctx.controller)
        });

    let reminder = warp::post()
        .and(warp::path!("plants" / String / "reminder"))
        .and(warp::body::json::<ReminderRequest>())
        .and(with_context(ctx.clone()))
        .map(|id: String, request: ReminderRequest, ctx: AppContext| {
            let toggled = lock(&ctx.controller)
                .toggle_reminder(&id, &ReportedPermission(request.permission));
            match toggled {
                Ok(_) => snapshot(&ctx.controller),
                Err(e) => fail(&e, action_status(&e)),
            }
        });

    let lexicon = warp::get()
        .and(warp::path("catalog"))
        .and(warp::path::end())
        .and(warp::query::<SearchQuery>())
        .and(with_context(ctx.clone()))
        .map(|query: SearchQuery, ctx: AppContext| {
            let language = lock(&ctx.controller).language();
            ok(&catalog::browse(&query.q, query.category, language))
        });

    let preview = warp::post()
        .and(warp::path!("catalog" / usize / "preview"))
        .and(with_context(ctx.clone()))
        .map(|index: usize, ctx: AppContext| {
            let previewed = lock(&ctx.controller).preview_catalog_entry(index);
            match previewed {
                Ok(()) => snapshot(&ctx.controller),
                Err(e) => fail(&e, action_status(&e)),
            }
        });

    let language = warp::put()
        .and(warp::path("language"))
        .and(warp::path::end())
        .and(warp::body::json::<LanguageRequest>())
        .and(with_context(ctx.clone()))
        .map(|request: LanguageRequest, ctx: AppContext| {
            lock(&ctx.controller).set_language(request.language);
            snapshot(&ctx.controller)
        });

    let dismiss = warp::post()
        .and(warp::path!("notices" / "dismiss"))
        .and(with_context(ctx))
        .map(|ctx: AppContext| {
            let mut controller = lock(&ctx.controller);
            controller.dismiss_toast();
            controller.dismiss_alert();
            ok(&controller.snapshot())
        });

    let scan_api = scanner_open.or(scanner_close).unify().or(scan).unify().or(save).unify().boxed();
    let plants_api = search
        .or(select)
        .unify()
        .or(water)
        .unify()
        .or(delete)
        .unify()
        .or(reminder)
        .unify()
        .boxed();
    let catalog_api = lexicon.or(preview).unify().boxed();

    state
        .or(scan_api)
        .unify()
        .or(plants_api)
        .unify()
        .or(catalog_api)
        .unify()
        .or(close_detail)
        .unify()
        .or(language)
        .unify()
        .or(dismiss)
        .unify()
}
