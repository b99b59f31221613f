use std::path::PathBuf;

/// Default administrator seeded on first boot. Only consulted while the
/// configured username is absent from the users table.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub branch: String,
    pub role: String,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            password: "Admin1234!".into(),
            name: "Admin".into(),
            surname: "Inicial".into(),
            branch: "01".into(),
            role: "admin".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub admin: AdminSeed,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_path = std::env::var("SQLITE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/cashdesk.sqlite"));

        let defaults = AdminSeed::default();
        let admin = AdminSeed {
            username: std::env::var("INITIAL_ADMIN_USER").unwrap_or(defaults.username),
            password: std::env::var("INITIAL_ADMIN_PASS").unwrap_or(defaults.password),
            name: std::env::var("INITIAL_ADMIN_NAME").unwrap_or(defaults.name),
            surname: std::env::var("INITIAL_ADMIN_SURNAME").unwrap_or(defaults.surname),
            branch: std::env::var("INITIAL_ADMIN_BRANCH").unwrap_or(defaults.branch),
            role: std::env::var("INITIAL_ADMIN_ROLE").unwrap_or(defaults.role),
        };

        Self {
            database_path,
            admin,
        }
    }
}
