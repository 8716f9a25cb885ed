//! `sl-output` — route serialization, activity import, and launch URLs.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`gpx`]    | GPX 1.1 writer, `parse_activity_points`                 |
//! | [`aml`]    | AML document writer                                     |
//! | [`import`] | GPX/CSV activity import, manual street CSV import,      |
//! |            | activity completion matching                            |
//! | [`links`]  | Google/Apple Maps launch URLs                           |
//! | [`xml`]    | XML escaping                                            |
//! | [`error`]  | `OutputError`, `OutputResult<T>`                        |

pub mod aml;
pub mod error;
pub mod gpx;
pub mod import;
pub mod links;
pub mod xml;

#[cfg(test)]
mod tests;

pub use aml::{write_aml, write_aml_file};
pub use error::{OutputError, OutputResult};
pub use gpx::{parse_activity_points, write_gpx, write_gpx_file};
pub use import::{apply_activity, import_streets_csv, parse_activity};
pub use links::{apple_maps_url, google_maps_url};
pub use xml::xml_escape;
