use anyhow::{anyhow, Result};

pub fn validate_base_url(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("nitrado.api_base_url is empty"));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(anyhow!("nitrado.api_base_url must be an http(s) url"));
    }
    Ok(())
}
