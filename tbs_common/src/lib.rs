mod helpers;
mod money;
mod secret;

pub use helpers::parse_boolean_flag;
pub use money::{Cents, CentsConversionError, CURRENCY_CODE, CURRENCY_CODE_LOWER};
pub use secret::Secret;
