//! Static plant catalog used for the lexicon and for mock identification.
//!
//! Each species is stored once with its language-neutral data and one
//! localized text block per [`Language`], so every language sees the same
//! plants in the same order.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{matches_names, CareInfo, IdentificationResult, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Easy,
    LowLight,
    AirPurifier,
    Tree,
    BrightLight,
    Succulent,
    Small,
    Medicinal,
    Sun,
    Hanging,
    PetFriendly,
    Flowering,
    Patterned,
    HighHumidity,
}

/// A catalog plant as seen in one language.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: &'static str,
    pub botanical_name: &'static str,
    pub confidence: f64,
    pub water_interval_days: u32,
    pub light: &'static str,
    pub temp: &'static str,
    pub description: &'static str,
    pub image_uri: &'static str,
    pub categories: &'static [Category],
}

impl CatalogEntry {
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn to_identification(&self) -> IdentificationResult {
        IdentificationResult {
            name: self.name.to_owned(),
            botanical_name: self.botanical_name.to_owned(),
            confidence: self.confidence,
            care_info: CareInfo {
                water_interval_days: self.water_interval_days,
                light: self.light.to_owned(),
                temp: self.temp.to_owned(),
            },
            description: Some(self.description.to_owned()),
        }
    }
}

struct Localized {
    name: &'static str,
    light: &'static str,
    description: &'static str,
}

struct Species {
    botanical_name: &'static str,
    water_interval_days: u32,
    temp: &'static str,
    image_uri: &'static str,
    categories: &'static [Category],
    /// Indexed in [`Language::ALL`] order.
    texts: [Localized; 3],
}

impl Species {
    fn entry(&self, language: Language) -> CatalogEntry {
        let text = &self.texts[language_slot(language)];
        CatalogEntry {
            name: text.name,
            botanical_name: self.botanical_name,
            confidence: 1.0,
            water_interval_days: self.water_interval_days,
            light: text.light,
            temp: self.temp,
            description: text.description,
            image_uri: self.image_uri,
            categories: self.categories,
        }
    }
}

fn language_slot(language: Language) -> usize {
    match language {
        Language::De => 0,
        Language::En => 1,
        Language::Es => 2,
    }
}

use Category::*;

static SPECIES: [Species; 8] = [
    Species {
        botanical_name: "Monstera deliciosa",
        water_interval_days: 7,
        temp: "18-24°C",
        image_uri: "https://images.unsplash.com/photo-1614594975525-e45190c55d0b?q=80&w=400&auto=format&fit=crop",
        categories: &[Easy, LowLight, AirPurifier],
        texts: [
            Localized {
                name: "Monstera",
                light: "Halbschatten",
                description: "Die Monstera Deliciosa, auch Fensterblatt genannt, ist bekannt für ihre großen, geteilten Blätter. Sie ist pflegeleicht und reinigt die Luft in Innenräumen effektiv.",
            },
            Localized {
                name: "Monstera",
                light: "Partial Shade",
                description: "The Monstera Deliciosa, also known as the Swiss Cheese Plant, is known for its large, split leaves. It is easy to care for and effectively purifies indoor air.",
            },
            Localized {
                name: "Costilla de Adán",
                light: "Sombra Parcial",
                description: "La Monstera Deliciosa es conocida por sus grandes hojas divididas. Es fácil de cuidar y purifica el aire interior de manera efectiva.",
            },
        ],
    },
    Species {
        botanical_name: "Ficus benjamina",
        water_interval_days: 5,
        temp: "16-24°C",
        image_uri: "https://images.unsplash.com/photo-1509223197845-458d87318791?q=80&w=400&auto=format&fit=crop",
        categories: &[Tree, BrightLight],
        texts: [
            Localized {
                name: "Birkenfeige",
                light: "Hell",
                description: "Die Birkenfeige ist eine beliebte Zimmerpflanze mit eleganten, überhängenden Zweigen und glänzenden Blättern. Sie reagiert empfindlich auf Standortwechsel.",
            },
            Localized {
                name: "Weeping Fig",
                light: "Bright",
                description: "The Weeping Fig is a popular houseplant with elegant, drooping branches and glossy leaves. It is sensitive to changes in location.",
            },
            Localized {
                name: "Ficus Benjamina",
                light: "Brillante",
                description: "El Ficus Benjamina es una planta de interior popular con ramas elegantes y caídas y hojas brillantes. Es sensible a los cambios de ubicación.",
            },
        ],
    },
    Species {
        botanical_name: "Echeveria elegans",
        water_interval_days: 14,
        temp: "18-28°C",
        image_uri: "https://images.unsplash.com/photo-1520302669765-66b37fb890d7?q=80&w=400&auto=format&fit=crop",
        categories: &[Succulent, Easy, Small],
        texts: [
            Localized {
                name: "Echeveria",
                light: "Sonnig",
                description: "Diese Sukkulente bildet wunderschöne Rosetten und speichert Wasser in ihren dicken Blättern. Sie ist ideal für sonnige Fensterbänke und sehr pflegeleicht.",
            },
            Localized {
                name: "Mexican Snowball",
                light: "Sunny",
                description: "This succulent forms beautiful rosettes and stores water in its thick leaves. It is ideal for sunny windowsills and very low maintenance.",
            },
            Localized {
                name: "Rosa de Alabastro",
                light: "Soleado",
                description: "Esta suculenta forma hermosas rosetas y almacena agua en sus hojas gruesas. Es ideal para alféizares soleados y requiere muy poco mantenimiento.",
            },
        ],
    },
    Species {
        botanical_name: "Sansevieria trifasciata",
        water_interval_days: 21,
        temp: "15-30°C",
        image_uri: "https://images.unsplash.com/photo-1620127530668-37c2275ae158?q=80&w=400&auto=format&fit=crop",
        categories: &[Succulent, Easy, LowLight, AirPurifier],
        texts: [
            Localized {
                name: "Bogenhanf",
                light: "Schatten bis Sonne",
                description: "Der Bogenhanf ist fast unzerstörbar. Er kommt mit wenig Licht und Wasser aus und ist einer der besten Luftreiniger für das Schlafzimmer.",
            },
            Localized {
                name: "Snake Plant",
                light: "Shade to Sun",
                description: "The Snake Plant is nearly indestructible. It tolerates low light and drought and is one of the best air purifiers for the bedroom.",
            },
            Localized {
                name: "Lengua de Suegra",
                light: "Sombra a Sol",
                description: "La Sansevieria es casi indestructible. Tolera poca luz y sequía, y es uno de los mejores purificadores de aire para el dormitorio.",
            },
        ],
    },
    Species {
        botanical_name: "Aloe vera",
        water_interval_days: 14,
        temp: "20-30°C",
        image_uri: "https://images.unsplash.com/photo-1567689265771-828557d4766c?q=80&w=400&auto=format&fit=crop",
        categories: &[Succulent, Medicinal, Sun],
        texts: [
            Localized {
                name: "Echte Aloe",
                light: "Sonnig",
                description: "Eine Heilpflanze, deren Gel bei Sonnenbrand hilft. Sie benötigt einen sehr hellen Standort und wenig Wasser.",
            },
            Localized {
                name: "Aloe Vera",
                light: "Sunny",
                description: "A medicinal plant whose gel helps with sunburn. It requires a very bright spot and little water.",
            },
            Localized {
                name: "Aloe Vera",
                light: "Soleado",
                description: "Una planta medicinal cuyo gel ayuda con las quemaduras solares. Requiere un lugar muy luminoso y poca agua.",
            },
        ],
    },
    Species {
        botanical_name: "Chlorophytum comosum",
        water_interval_days: 7,
        temp: "15-23°C",
        image_uri: "https://images.unsplash.com/photo-1616766649725-b44c698308eb?q=80&w=400&auto=format&fit=crop",
        categories: &[Easy, Hanging, PetFriendly],
        texts: [
            Localized {
                name: "Grünlilie",
                light: "Halbschatten",
                description: "Die Grünlilie ist extrem anpassungsfähig und bildet schnell Ableger. Sie verzeiht Gießfehler und ist ideal für Anfänger.",
            },
            Localized {
                name: "Spider Plant",
                light: "Partial Shade",
                description: "The Spider Plant is extremely adaptable and quickly forms offshoots. It forgives watering mistakes and is ideal for beginners.",
            },
            Localized {
                name: "Cinta",
                light: "Sombra Parcial",
                description: "La Cinta es extremadamente adaptable y forma retoños rápidamente. Perdona los errores de riego y es ideal para principiantes.",
            },
        ],
    },
    Species {
        botanical_name: "Spathiphyllum",
        water_interval_days: 5,
        temp: "18-25°C",
        image_uri: "https://images.unsplash.com/photo-1610496185876-06835a64627d?q=80&w=400&auto=format&fit=crop",
        categories: &[Flowering, LowLight, AirPurifier],
        texts: [
            Localized {
                name: "Einblatt",
                light: "Halbschatten",
                description: "Das Einblatt zeigt durch hängende Blätter an, wann es Wasser braucht. Es blüht auch bei weniger Licht wunderschön weiß.",
            },
            Localized {
                name: "Peace Lily",
                light: "Partial Shade",
                description: "The Peace Lily shows when it needs water by drooping its leaves. It blooms beautifully white even in lower light.",
            },
            Localized {
                name: "Cuna de Moisés",
                light: "Sombra Parcial",
                description: "La Cuna de Moisés muestra cuándo necesita agua al dejar caer sus hojas. Florece hermosamente en blanco incluso con poca luz.",
            },
        ],
    },
    Species {
        botanical_name: "Calathea",
        water_interval_days: 4,
        temp: "18-24°C",
        image_uri: "https://images.unsplash.com/photo-1600869680373-b82fa72f8823?q=80&w=400&auto=format&fit=crop",
        categories: &[Patterned, PetFriendly, HighHumidity],
        texts: [
            Localized {
                name: "Korbmarante",
                light: "Halbschatten",
                description: "Calatheas sind bekannt für ihre gemusterten Blätter, die sich nachts zusammenfalten. Sie benötigen hohe Luftfeuchtigkeit.",
            },
            Localized {
                name: "Calathea",
                light: "Partial Shade",
                description: "Calatheas are known for their patterned leaves that fold up at night. They require high humidity.",
            },
            Localized {
                name: "Calathea",
                light: "Sombra Parcial",
                description: "Las Calatheas son conocidas por sus hojas estampadas que se pliegan por la noche. Requieren alta humedad.",
            },
        ],
    },
];

/// Every catalog entry in `language`, in catalog order.
pub fn entries(language: Language) -> Vec<CatalogEntry> {
    SPECIES.iter().map(|s| s.entry(language)).collect()
}

pub fn entry(index: usize, language: Language) -> Option<CatalogEntry> {
    SPECIES.get(index).map(|s| s.entry(language))
}

/// Case-insensitive substring search over name and botanical name. An empty
/// query returns the whole catalog.
pub fn search(query: &str, language: Language) -> Vec<CatalogEntry> {
    browse(query, None, language)
}

pub fn by_category(category: Category, language: Language) -> Vec<CatalogEntry> {
    entries(language)
        .into_iter()
        .filter(|e| e.has_category(category))
        .collect()
}

/// Lexicon listing: [`search`], narrowed to one category when given.
pub fn browse(query: &str, category: Option<Category>, language: Language) -> Vec<CatalogEntry> {
    let candidates = match category {
        Some(category) => by_category(category, language),
        None => entries(language),
    };
    candidates
        .into_iter()
        .filter(|e| matches_names(e.name, e.botanical_name, query))
        .collect()
}

/// Uniformly random entry, or `None` if the catalog is empty.
pub fn random_entry<R: Rng + ?Sized>(language: Language, rng: &mut R) -> Option<CatalogEntry> {
    SPECIES.choose(rng).map(|s| s.entry(language))
}
