//! Canned example messages for the form.
//!
//! The example buttons and the quick-load hook carry different texts; both
//! sets are kept as they are.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    Scam,
    Spam,
    Safe,
}

impl FromStr for ExampleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scam" => Ok(ExampleKind::Scam),
            "spam" => Ok(ExampleKind::Spam),
            "safe" => Ok(ExampleKind::Safe),
            _ => Err(format!("Invalid example kind: {}", s)),
        }
    }
}

impl ExampleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExampleKind::Scam => "scam",
            ExampleKind::Spam => "spam",
            ExampleKind::Safe => "safe",
        }
    }

    pub const ALL: [ExampleKind; 3] = [ExampleKind::Scam, ExampleKind::Spam, ExampleKind::Safe];
}

/// Which UI trigger asked for the example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleSource {
    /// The example buttons under the form (`?pick=`).
    Typed,
    /// The `?example=` quick-load link.
    Quick,
}

pub fn example_text(kind: ExampleKind, source: ExampleSource) -> &'static str {
    match (source, kind) {
        (ExampleSource::Typed, ExampleKind::Scam) => {
            "URGENT: Your PayPal account has been limited due to unusual activity. Click here immediately to verify your identity at http://paypal-verify.com or your account will be permanently closed within 24 hours. Act now!"
        }
        (ExampleSource::Typed, ExampleKind::Spam) => {
            "🎉 CONGRATULATIONS! You've won $10,000! Click this link now to claim your prize: http://fake-lottery.com. Limited time offer - don't miss out on this amazing opportunity!"
        }
        (ExampleSource::Typed, ExampleKind::Safe) => {
            "Hi! Just wanted to check in and see how you're doing. Would love to grab coffee tomorrow at 10am if you're free. Let me know what works for you. Thanks!"
        }
        (ExampleSource::Quick, ExampleKind::Scam) => {
            "URGENT: Your PayPal account has been limited due to unusual activity. Click here immediately to verify your identity at http://paypal-verify.com or your account will be permanently closed within 24 hours."
        }
        (ExampleSource::Quick, ExampleKind::Spam) => {
            "AMAZING OFFER! Get rich quick with our exclusive investment opportunity! Limited slots available. Click now to earn passive income. Don't miss out!"
        }
        (ExampleSource::Quick, ExampleKind::Safe) => {
            "Hi! Just wanted to check in and see how you're doing. Would love to grab coffee tomorrow at 10am. Let me know if you're free. Thanks!"
        }
    }
}
