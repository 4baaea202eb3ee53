/// Fax.Plus constants

/// REST API v3 host
pub const DEFAULT_FAXPLUS_BASE_URL: &str = "https://restapi.fax.plus/v3";

/// Owner id meaning "the account the access token belongs to"
pub const OWNER_SELF: &str = "self";

/// Environment variable holding the bearer token
pub const ACCESS_TOKEN_ENV: &str = "FAXPLUS_ACCESS_TOKEN";

/// Multipart field name expected by the file upload endpoint
pub const UPLOAD_FIELD_NAME: &str = "fax_file";
