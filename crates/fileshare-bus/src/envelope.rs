use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fileshare_shared::Message;

/// Wire frame carried on the bus: the chat message plus the identity of the
/// endpoint that published it, so receivers can drop their own frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub origin: Uuid,
    pub message: Message,
}

impl Envelope {
    /// Encode as a single line of JSON (the socket transport framing).
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from one line of JSON.
    pub fn from_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileshare_shared::User;

    #[test]
    fn test_envelope_line_roundtrip() {
        let env = Envelope {
            origin: Uuid::new_v4(),
            message: Message::text(User::random(), "over the wire"),
        };
        let line = env.to_line().unwrap();
        assert!(!line.contains('\n'));
        let back = Envelope::from_line(&line).unwrap();
        assert_eq!(back.origin, env.origin);
        assert_eq!(back.message, env.message);
    }
}
