//! Integration tests for dls-ade

mod helpers;
mod test_classify;
mod test_list_releases;
mod test_properties;
mod test_release;
