pub mod form;
pub mod gps;
pub mod html;
pub mod upload;

pub use form::{DATE_FORMAT, FormFields, FormReader};
pub use gps::{GpsCoordinates, GpsParseError, parse_gps};
pub use html::{escape, escape_opt};
pub use upload::{StoredImage, remove_image, sanitize_filename, save_image};
