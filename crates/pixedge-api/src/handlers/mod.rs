pub mod composite;
pub mod process;

use pixedge_core::constants::BANNER;

/// Fallback for every path that is not a processing route.
pub async fn banner() -> &'static str {
    BANNER
}
