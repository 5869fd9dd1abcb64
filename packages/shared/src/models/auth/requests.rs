use serde::{Deserialize, Serialize};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 35;
const PASSWORD_MIN: usize = 2;
const PASSWORD_MAX: usize = 35;
const LEAGUE_NAME_MIN: usize = 3;
const LEAGUE_NAME_MAX: usize = 50;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateLeagueRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddPlayerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_length("first_name", &self.first_name, NAME_MIN, NAME_MAX)?;
        check_length("last_name", &self.last_name, NAME_MIN, NAME_MAX)?;
        check_email(&self.email)?;
        check_length("password", &self.password, PASSWORD_MIN, PASSWORD_MAX)
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_email(&self.email)?;
        check_required("password", &self.password)
    }
}

impl CreateLeagueRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_length("name", &self.name, LEAGUE_NAME_MIN, LEAGUE_NAME_MAX)
    }
}

impl AddPlayerRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_length("first_name", &self.first_name, NAME_MIN, NAME_MAX)?;
        check_length("last_name", &self.last_name, NAME_MIN, NAME_MAX)?;
        check_email(&self.email)
    }
}

fn check_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    check_required(field, value)?;
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(format!(
            "{} must be between {} and {} characters long",
            field, min, max
        ));
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), String> {
    check_required("email", value)?;
    let invalid = || Err("email must be a valid email address".to_string());

    let Some((local, domain)) = value.split_once('@') else {
        return invalid();
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return invalid();
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && tld.len() >= 2 => Ok(()),
        _ => invalid(),
    }
}
