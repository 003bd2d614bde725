use serde::{Deserialize, Serialize};

/// The signed-in user, set once authentication has completed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub profile_image_url: String,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Accounts awaiting admin approval.
    pub fn is_pending(&self) -> bool {
        self.role == "pending"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_checks() {
        let mut user = SessionUser {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            role: "pending".to_string(),
            profile_image_url: "/user.png".to_string(),
        };
        assert!(user.is_pending());
        assert!(!user.is_admin());

        user.role = "admin".to_string();
        assert!(user.is_admin());
    }
}
