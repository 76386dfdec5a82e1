/// The 24 governorates a place can belong to.
pub const GOVERNORATES: [&str; 24] = [
    "Tunis",
    "Ariana",
    "Ben Arous",
    "Manouba",
    "Nabeul",
    "Zaghouan",
    "Bizerte",
    "Béja",
    "Jendouba",
    "Le Kef",
    "Siliana",
    "Sousse",
    "Monastir",
    "Mahdia",
    "Sfax",
    "Kairouan",
    "Kasserine",
    "Sidi Bouzid",
    "Gabès",
    "Médenine",
    "Tataouine",
    "Gafsa",
    "Tozeur",
    "Kébili",
];

/// Categories accepted by the dashboard.
pub const CATEGORIES: [&str; 5] = [
    "Café",
    "Restaurant",
    "Restauration rapide",
    "Hotel",
    "Boucherie",
];

/// Placeholder used by the raw dataset loader when a record carries no category
/// or governorate.
pub const UNSPECIFIED: &str = "Non spécifié";

pub fn is_category(value: &str) -> bool {
    CATEGORIES.contains(&value)
}

pub fn is_governorate(value: &str) -> bool {
    GOVERNORATES.contains(&value)
}
