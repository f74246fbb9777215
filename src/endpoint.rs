use crate::model::error::StorageError;

/// Region code served by the primary endpoint.
pub const DEFAULT_REGION: &str = "de";

const STORAGE_HOST: &str = "storage.bunnycdn.com";

pub fn is_default_region(region: &str) -> bool {
    region.is_empty() || region == DEFAULT_REGION
}

pub fn resolve(storage_zone: &str, region: &str) -> Result<String, StorageError> {
    if storage_zone.is_empty() {
        return Err(StorageError::Config(
            "storage_zone is not specified/missing".to_string(),
        ));
    }

    return if is_default_region(region) {
        Ok(format!("https://{}/{}/", STORAGE_HOST, storage_zone))
    } else {
        Ok(format!("https://{}.{}/{}/", region, STORAGE_HOST, storage_zone))
    };
}
