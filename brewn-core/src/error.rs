use thiserror::Error;

/// Errors produced by the brew calculators and the recipe exchange paths.
#[derive(Error, Debug)]
pub enum BrewError {
    /// A numeric input that the calculators cannot work with
    /// (non-positive dose, zero pour count, out-of-range step bound).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// An imported recipe that is missing fields or carries wrong-typed
    /// values. The caller's current state must stay untouched.
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),
    /// A share token that cannot be decoded back into a recipe.
    #[error("invalid share token: {0}")]
    InvalidToken(String),
}
