pub mod card;
pub mod catalogue;
pub mod validate;

pub use card::{Card, LegendarySkill, Memoria, StatRow};
pub use catalogue::{load_catalogue, Catalogue, CatalogueError, DEFAULT_CATALOGUE_PATH};
pub use validate::{validate_catalogue, ValidationDiagnostic, ValidationReport, ValidationSeverity};
