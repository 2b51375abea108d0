use serde::{Deserialize, Deserializer, Serialize};

/// Profile record returned by the auth endpoints.
///
/// The backend is loose about its admin markers: `is_admin` may arrive as a
/// real boolean, the string `"true"`, or be missing entirely. The flags are
/// normalized once at this boundary; everything downstream consumes
/// [`UserProfile::is_admin_user`] as a plain boolean capability.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub is_admin: AdminFlag,
    #[serde(default)]
    pub is_staff: AdminFlag,
    #[serde(default)]
    pub is_superuser: AdminFlag,
}

impl UserProfile {
    pub fn is_admin_user(&self) -> bool {
        self.is_admin.0 || self.is_staff.0 || self.is_superuser.0
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Boolean-like flag accepting `true`, `"true"`, a non-zero integer, or null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminFlag(pub bool);

impl Serialize for AdminFlag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Text(String),
    Int(i64),
}

impl<'de> Deserialize<'de> for AdminFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = Option::<FlagRepr>::deserialize(deserializer)?;
        let value = match repr {
            Some(FlagRepr::Bool(b)) => b,
            Some(FlagRepr::Text(s)) => s.eq_ignore_ascii_case("true"),
            Some(FlagRepr::Int(i)) => i != 0,
            None => false,
        };
        Ok(AdminFlag(value))
    }
}
