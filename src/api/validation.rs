use super::ApiError;

pub fn validate_term(term: &str) -> Result<&str, ApiError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("termo cannot be empty"));
    }
    Ok(trimmed)
}

pub fn validate_days(days: i64) -> Result<i64, ApiError> {
    const MIN_DAYS: i64 = 1;
    const MAX_DAYS: i64 = 30;

    if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
        return Err(ApiError::validation(format!(
            "Invalid dias: {}. Value must be between {} and {}",
            days, MIN_DAYS, MAX_DAYS
        )));
    }
    Ok(days)
}

pub fn validate_pages(pages: u32) -> Result<u32, ApiError> {
    const MIN_PAGES: u32 = 1;
    const MAX_PAGES: u32 = 10;

    if !(MIN_PAGES..=MAX_PAGES).contains(&pages) {
        return Err(ApiError::validation(format!(
            "Invalid paginas: {}. Value must be between {} and {}",
            pages, MIN_PAGES, MAX_PAGES
        )));
    }
    Ok(pages)
}
