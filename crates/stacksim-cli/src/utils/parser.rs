use stacksim::core::models::stack::StackEntry;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error(
        "Invalid stack entry '{0}'. Expected 'compound=dose[@freq][:ester]' (e.g., 'testosterone=500@2:enanthate')."
    )]
    InvalidFormat(String),

    #[error("Invalid dose '{dose}' in stack entry '{entry}'.")]
    InvalidDose { entry: String, dose: String },

    #[error("Invalid frequency '{frequency}' in stack entry '{entry}'.")]
    InvalidFrequency { entry: String, frequency: String },
}

/// Parses an inline stack entry of the form `compound=dose[@freq][:ester]`.
pub fn parse_stack_entry(input: &str) -> Result<StackEntry, ParseError> {
    let (compound, rest) = input
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidFormat(input.to_string()))?;
    let compound = compound.trim();
    if compound.is_empty() || rest.trim().is_empty() {
        return Err(ParseError::InvalidFormat(input.to_string()));
    }

    let (rest, ester) = match rest.split_once(':') {
        Some((head, ester)) if !ester.trim().is_empty() => {
            (head, Some(ester.trim().to_string()))
        }
        Some(_) => return Err(ParseError::InvalidFormat(input.to_string())),
        None => (rest, None),
    };

    let (dose_part, frequency) = match rest.split_once('@') {
        Some((dose, freq)) => {
            let parsed = freq
                .trim()
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidFrequency {
                    entry: input.to_string(),
                    frequency: freq.trim().to_string(),
                })?;
            (dose, Some(parsed))
        }
        None => (rest, None),
    };

    let dose = dose_part
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidDose {
            entry: input.to_string(),
            dose: dose_part.trim().to_string(),
        })?;

    Ok(StackEntry {
        compound: compound.to_string(),
        dose,
        frequency,
        ester,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_and_dose() {
        let entry = parse_stack_entry("testosterone=500").unwrap();
        assert_eq!(entry.compound, "testosterone");
        assert_eq!(entry.dose, 500.0);
        assert_eq!(entry.frequency, None);
        assert_eq!(entry.ester, None);
    }

    #[test]
    fn parses_frequency_and_ester() {
        let entry = parse_stack_entry("testosterone=500@2:enanthate").unwrap();
        assert_eq!(entry.frequency, Some(2.0));
        assert_eq!(entry.ester.as_deref(), Some("enanthate"));
    }

    #[test]
    fn parses_ester_without_frequency() {
        let entry = parse_stack_entry("nandrolone=300:decanoate").unwrap();
        assert_eq!(entry.frequency, None);
        assert_eq!(entry.ester.as_deref(), Some("decanoate"));
    }

    #[test]
    fn rejects_missing_equals() {
        assert!(matches!(
            parse_stack_entry("testosterone500"),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_unparseable_dose() {
        assert!(matches!(
            parse_stack_entry("testosterone=lots"),
            Err(ParseError::InvalidDose { .. })
        ));
    }

    #[test]
    fn rejects_unparseable_frequency() {
        assert!(matches!(
            parse_stack_entry("testosterone=500@daily"),
            Err(ParseError::InvalidFrequency { .. })
        ));
    }

    #[test]
    fn rejects_empty_ester() {
        assert!(matches!(
            parse_stack_entry("testosterone=500:"),
            Err(ParseError::InvalidFormat(_))
        ));
    }
}
