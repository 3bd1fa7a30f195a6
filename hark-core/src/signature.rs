//! Listener signatures and argument validation.

use crate::{arg::Arg, error::SignatureError, param::ParamType};
use std::fmt;

/// The declared parameter list of a listener.
///
/// A signature is a list of fixed parameters, optionally followed by a
/// variadic tail accepting zero or more arguments of one element type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    params: Vec<ParamType>,
    variadic: Option<ParamType>,
}

impl Signature {
    /// A fixed-arity signature.
    pub fn new(params: impl IntoIterator<Item = ParamType>) -> Self {
        Self {
            params: params.into_iter().collect(),
            variadic: None,
        }
    }

    /// A signature whose last parameter is variadic over `element`.
    pub fn variadic(params: impl IntoIterator<Item = ParamType>, element: ParamType) -> Self {
        Self {
            params: params.into_iter().collect(),
            variadic: Some(element),
        }
    }

    /// The fixed parameters, excluding the variadic tail.
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// The element type of the variadic tail, if any.
    pub fn variadic_element(&self) -> Option<&ParamType> {
        self.variadic.as_ref()
    }

    /// Whether the signature ends in a variadic parameter.
    pub fn is_variadic(&self) -> bool {
        self.variadic.is_some()
    }

    /// Number of declared parameters, counting the variadic tail as one.
    pub fn arity(&self) -> usize {
        self.params.len() + usize::from(self.variadic.is_some())
    }

    /// Check that `args` can be bound to this signature.
    ///
    /// Arity is checked first. Types are then checked left to right and
    /// the first failing position is reported. A variadic element mismatch
    /// is reported at the position of the variadic parameter itself.
    pub fn check(&self, event: &str, args: &[Arg]) -> Result<(), SignatureError> {
        let fixed = self.params.len();
        let got = args.len();

        match self.variadic {
            None if got != fixed => {
                return Err(SignatureError::ArityMismatch {
                    event: event.to_owned(),
                    expected: fixed,
                    got,
                });
            }
            Some(_) if got < fixed => {
                return Err(SignatureError::InsufficientArguments {
                    event: event.to_owned(),
                    expected: fixed,
                    got,
                });
            }
            _ => {}
        }

        for (index, (param, arg)) in self.params.iter().zip(args).enumerate() {
            if !param.accepts(arg.type_tag()) {
                return Err(mismatch(event, index + 1, param, arg));
            }
        }

        if let Some(element) = &self.variadic {
            if let Some(arg) = args[fixed..]
                .iter()
                .find(|arg| !element.accepts(arg.type_tag()))
            {
                return Err(mismatch(event, fixed + 1, element, arg));
            }
        }

        Ok(())
    }
}

fn mismatch(event: &str, position: usize, param: &ParamType, arg: &Arg) -> SignatureError {
    SignatureError::TypeMismatch {
        event: event.to_owned(),
        position,
        expected: param.name().into_owned(),
        got: arg.type_name().to_owned(),
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        if let Some(element) = &self.variadic {
            if !self.params.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "...{element}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn int_string() -> Signature {
        Signature::new([ParamType::of::<i32>(), ParamType::of::<String>()])
    }

    fn int_ints() -> Signature {
        Signature::variadic([ParamType::of::<i32>()], ParamType::of::<i32>())
    }

    #[test]
    fn test_fixed_arity() {
        let sig = int_string();
        assert_eq!(sig.arity(), 2);
        assert!(sig.check("e", &args![1, "x".to_string()]).is_ok());
        assert_eq!(
            sig.check("e", &args![1]),
            Err(SignatureError::ArityMismatch {
                event: "e".into(),
                expected: 2,
                got: 1,
            })
        );
        assert_eq!(
            sig.check("e", &args![1, "x".to_string(), 3]),
            Err(SignatureError::ArityMismatch {
                event: "e".into(),
                expected: 2,
                got: 3,
            })
        );
    }

    #[test]
    fn test_type_mismatch_reports_first_position() {
        let sig = int_string();
        assert_eq!(
            sig.check("e", &args![10, 20]),
            Err(SignatureError::TypeMismatch {
                event: "e".into(),
                position: 2,
                expected: "String".into(),
                got: "i32".into(),
            })
        );
        assert_eq!(
            sig.check("e", &args!["a", 20]),
            Err(SignatureError::TypeMismatch {
                event: "e".into(),
                position: 1,
                expected: "i32".into(),
                got: "&str".into(),
            })
        );
    }

    #[test]
    fn test_variadic() {
        let sig = int_ints();
        assert_eq!(sig.arity(), 2);
        assert_eq!(
            sig.check("v", &args![]),
            Err(SignatureError::InsufficientArguments {
                event: "v".into(),
                expected: 1,
                got: 0,
            })
        );
        assert!(sig.check("v", &args![10]).is_ok());
        assert!(sig.check("v", &args![10, 20, 30]).is_ok());
        assert_eq!(
            sig.check("v", &args![10, "x"]),
            Err(SignatureError::TypeMismatch {
                event: "v".into(),
                position: 2,
                expected: "i32".into(),
                got: "&str".into(),
            })
        );
        assert_eq!(
            sig.check("v", &args![10, 20, 30, 40, 50, false, 60]),
            Err(SignatureError::TypeMismatch {
                event: "v".into(),
                position: 2,
                expected: "i32".into(),
                got: "bool".into(),
            })
        );
    }

    #[test]
    fn test_any_parameters() {
        let sig = Signature::variadic(
            [ParamType::of::<i32>(), ParamType::Any],
            ParamType::Any,
        );
        assert!(sig.check("a", &args![10, "test"]).is_ok());
        assert!(sig.check("a", &args![10, true, 30, "x", vec![1_u8]]).is_ok());
        assert!(sig.check("a", &args![10]).is_err());
    }

    #[test]
    fn test_empty_signature() {
        let sig = Signature::default();
        assert!(sig.check("empty", &args![]).is_ok());
        assert!(sig.check("empty", &args![1]).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(int_string().to_string(), "(i32, String)");
        assert_eq!(int_ints().to_string(), "(i32, ...i32)");
        assert_eq!(
            Signature::variadic([], ParamType::Any).to_string(),
            "(...any)"
        );
    }
}
