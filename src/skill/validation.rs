//! Applicative validation: run every independent sub-parse, keep every failure.
//!
//! `Result`'s `?` stops at the first error. Parsers here instead build a tuple
//! (or list) of already-evaluated sub-results and hand it to [Validate::validate],
//! which returns all successes or the concatenation of all error lists.

use crate::skill::error::ParseError;

pub type Validated<T> = Result<T, Vec<ParseError>>;

/// Lift a single-error result into the accumulating form.
pub fn lift<T>(result: Result<T, ParseError>) -> Validated<T> {
    result.map_err(|err| vec![err])
}

pub trait Validate {
    type Output;

    fn validate(self) -> Validated<Self::Output>;
}

macro_rules! impl_validate_tuple {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty),+> Validate for ($(Validated<$ty>,)+) {
            type Output = ($($ty,)+);

            fn validate(self) -> Validated<Self::Output> {
                let ($($var,)+) = self;
                let mut errors = Vec::new();
                $(
                    let $var = match $var {
                        Ok(value) => Some(value),
                        Err(mut failed) => {
                            errors.append(&mut failed);
                            None
                        }
                    };
                )+
                match ($($var,)+) {
                    ($(Some($var),)+) if errors.is_empty() => Ok(($($var,)+)),
                    _ => Err(errors),
                }
            }
        }
    };
}

impl_validate_tuple!(A a);
impl_validate_tuple!(A a, B b);
impl_validate_tuple!(A a, B b, C c);
impl_validate_tuple!(A a, B b, C c, D d);
impl_validate_tuple!(A a, B b, C c, D d, E e);
impl_validate_tuple!(A a, B b, C c, D d, E e, F f);
impl_validate_tuple!(A a, B b, C c, D d, E e, F f, G g);

/// List form: all items or every item's errors, in order.
pub fn validate_all<T, I>(results: I) -> Validated<Vec<T>>
where
    I: IntoIterator<Item = Validated<T>>,
{
    let mut values = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(mut failed) => errors.append(&mut failed),
        }
    }
    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}
