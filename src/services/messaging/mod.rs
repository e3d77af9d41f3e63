pub mod twilio;

use async_trait::async_trait;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()>;
}

/// Normalizes a US phone number to E.164. Numbers that already carry a `+`
/// country prefix are passed through with formatting characters removed.
pub fn to_e164(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if phone.trim_start().starts_with('+') {
        return (digits.len() >= 8).then(|| format!("+{digits}"));
    }
    match digits.len() {
        10 => Some(format!("+1{digits}")),
        11 if digits.starts_with('1') => Some(format!("+{digits}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_e164() {
        assert_eq!(to_e164("5551234567").as_deref(), Some("+15551234567"));
        assert_eq!(to_e164("(555) 123-4567").as_deref(), Some("+15551234567"));
        assert_eq!(to_e164("1-555-123-4567").as_deref(), Some("+15551234567"));
        assert_eq!(to_e164("+44 20 7946 0958").as_deref(), Some("+442079460958"));
        assert_eq!(to_e164("12345"), None);
    }
}
