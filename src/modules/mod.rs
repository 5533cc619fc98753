pub mod books;
pub mod store;

use catalog_db::Store;
use catalog_kernel::ModuleRegistry;

/// Register the store lifecycle module and every catalog module with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: &Store) {
    registry.register_core(std::sync::Arc::new(store::StoreModule::new(store.clone())));
    registry.register_custom(books::create_module(store));
}
