pub mod config;

use validator::ValidationErrors;

/// Flattens derive-generated validation errors into one human-readable line
/// for the error envelope's `message` field.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(max = 3, message = "name too long"))]
        name: String,
        #[validate(range(min = 1, max = 5, message = "difficulty out of range"))]
        difficulty: i32,
    }

    #[test]
    fn collects_all_field_messages() {
        let sample = Sample {
            name: "too long for sure".into(),
            difficulty: 9,
        };
        let errors = sample.validate().unwrap_err();
        let formatted = format_validation_errors(&errors);
        assert_eq!(formatted, "difficulty out of range; name too long");
    }
}
