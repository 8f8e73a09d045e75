pub type Validator = Box<dyn Fn(&str) -> Result<(), String> + Send>;

pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.trim().is_empty() {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

pub fn non_empty_choice(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.is_empty() {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank_and_whitespace() {
        let validator = required("missing");
        assert_eq!(validator(""), Err("missing".to_string()));
        assert_eq!(validator("   "), Err("missing".to_string()));
        assert_eq!(validator(" key "), Ok(()));
    }

    #[test]
    fn non_empty_choice_accepts_any_selection() {
        let validator = non_empty_choice("nothing selected");
        assert!(validator("").is_err());
        assert!(validator(" ").is_ok());
    }
}
