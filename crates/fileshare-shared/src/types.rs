use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{ASSISTANT_COLOR, ASSISTANT_ID, ASSISTANT_NAME, AVATAR_COLORS};

/// A chat participant. Created once per profile and immutable afterwards;
/// every session on the same data dir re-hydrates the same user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar_color: String,
}

impl User {
    /// Generate a fresh random profile: `user-<9 alnum>` id, a short display
    /// name derived from it, and a palette color.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let tag: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        let color = AVATAR_COLORS[rng.gen_range(0..AVATAR_COLORS.len())];
        Self {
            id: format!("user-{tag}"),
            name: format!("User-{}", &tag[..4]),
            avatar_color: color.to_string(),
        }
    }

    /// The fixed synthetic user that authors summary messages.
    pub fn assistant() -> Self {
        Self {
            id: ASSISTANT_ID.to_string(),
            name: ASSISTANT_NAME.to_string(),
            avatar_color: ASSISTANT_COLOR.to_string(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.id == ASSISTANT_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_profile_shape() {
        let user = User::random();
        assert!(user.id.starts_with("user-"));
        assert_eq!(user.id.len(), "user-".len() + 9);
        assert!(user.name.starts_with("User-"));
        assert!(AVATAR_COLORS.contains(&user.avatar_color.as_str()));
    }

    #[test]
    fn test_random_profiles_are_distinct() {
        assert_ne!(User::random().id, User::random().id);
    }

    #[test]
    fn test_assistant_is_fixed() {
        let a = User::assistant();
        assert!(a.is_assistant());
        assert_eq!(a, User::assistant());
    }
}
