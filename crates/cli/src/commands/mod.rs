//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use catzo_storefront::cart::CartStore;
use catzo_storefront::config::StorefrontConfig;
use catzo_storefront::storage::FileSnapshotStore;
use catzo_storefront::supabase::SupabaseClient;

use catzo_storefront::error::Result;

/// Open the cart persisted under the configured data directory.
fn open_cart(config: &StorefrontConfig) -> CartStore<FileSnapshotStore> {
    CartStore::open(FileSnapshotStore::new(&config.data_dir))
}

/// Supabase client, or a configuration error naming the missing variable.
fn supabase(config: &StorefrontConfig) -> Result<SupabaseClient> {
    Ok(SupabaseClient::new(config.require_supabase()?)?)
}
