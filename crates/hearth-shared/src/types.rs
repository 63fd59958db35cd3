use serde::{Deserialize, Serialize};

// Session id assigned by the backend
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// One participant as reported by the backend roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub channel_id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub priority_speaker: bool,
    #[serde(default)]
    pub recording: bool,
    #[serde(default)]
    pub self_deaf: bool,
    #[serde(default)]
    pub self_mute: bool,
    #[serde(default)]
    pub suppress: bool,
    #[serde(default)]
    pub talking: bool,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Mutable access to one of the locally cached text fields.
    pub fn field_mut(&mut self, field: UserField) -> &mut String {
        match field {
            UserField::Comment => &mut self.comment,
            UserField::ProfilePicture => &mut self.profile_picture,
        }
    }

    pub fn field(&self, field: UserField) -> &str {
        match field {
            UserField::Comment => &self.comment,
            UserField::ProfilePicture => &self.profile_picture,
        }
    }
}

/// Text fields that are fetched lazily and updated one at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Comment,
    ProfilePicture,
}

impl std::fmt::Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comment => f.write_str("comment"),
            Self::ProfilePicture => f.write_str("profile_picture"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_shape() {
        let json = r#"{
            "id": 7,
            "channel_id": 2,
            "name": "alice",
            "comment": "hi",
            "profile_picture": "a.png",
            "deaf": false,
            "mute": true,
            "priority_speaker": false,
            "recording": false,
            "self_deaf": false,
            "self_mute": true,
            "suppress": false,
            "talking": true
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, UserId(7));
        assert_eq!(user.channel_id, 2);
        assert!(user.mute);
        assert!(user.self_mute);
        assert!(user.talking);
        assert_eq!(user.field(UserField::ProfilePicture), "a.png");
    }

    #[test]
    fn test_missing_flags_default_to_false() {
        let user: User = serde_json::from_str(r#"{"id": 3, "channel_id": 0}"#).unwrap();
        assert_eq!(user, User::new(3, ""));
    }

    #[test]
    fn test_new_leaves_other_fields_default() {
        let user = User::new(9, "carol");
        assert_eq!(user.id, UserId(9));
        assert_eq!(user.name, "carol");
        assert_eq!(user.channel_id, 0);
        assert!(user.comment.is_empty());
        assert!(!user.talking && !user.mute && !user.deaf);
        assert_eq!(UserId::default(), UserId(0));
    }

    #[test]
    fn test_field_mut() {
        let mut user = User::new(1, "bob");
        *user.field_mut(UserField::Comment) = "away".into();
        assert_eq!(user.comment, "away");
        assert!(user.profile_picture.is_empty());
    }
}
