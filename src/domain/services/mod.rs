pub mod validation;

pub use validation::RepoValidator;
