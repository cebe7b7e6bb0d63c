use env_logger::Env;
use log::{info, warn};
use shopkeep::storage::database_storage::DatabaseStorage;
use shopkeep::storage::file_storage::FileStorage;
use shopkeep::storage::memory_storage::MemoryStorage;
use shopkeep::storage::storage_trait::ProductStore;
use shopkeep::storage::types::{ProductDraft, ProductPatch};
use std::env;
use std::fs;
use std::path::PathBuf;

fn draft(name: &str, category: &str, price: f64, quantity: u32) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: format!("{name} from the backend demo"),
        category: category.to_string(),
        price,
        quantity,
        dispatched: false,
    }
}

fn run_workflow(label: &str, storage: &dyn ProductStore) {
    let laptop = storage
        .add_product(draft("Laptop", "Electronics", 999.0, 12))
        .expect("add laptop");
    let shirt = storage
        .add_product(draft("T-Shirt", "Clothing", 15.5, 3))
        .expect("add shirt");
    storage
        .add_product(draft("Coffee Mug", "Home", 8.0, 40))
        .expect("add mug");

    storage
        .update_product(
            &laptop.id,
            ProductPatch {
                price: Some(899.0),
                ..Default::default()
            },
        )
        .expect("update laptop price");

    storage.dispatch_product(&shirt.id).expect("dispatch shirt");

    let products = storage.list_products().expect("list products");
    info!("[{label}] {} product(s) in catalog", products.len());
    for p in &products {
        info!(
            "[{label}] id={} name={} category={} price={} qty={} dispatched={}",
            p.id, p.name, p.category, p.price, p.quantity, p.dispatched
        );
    }

    let dispatched = products.iter().filter(|p| p.dispatched).count();
    if dispatched != 1 {
        warn!("[{label}] expected exactly one dispatched product, found {dispatched}");
    }
}

fn main() {
    // Initialize logger (RUST_LOG can override; default to info)
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    // Choose an output directory for the file and database backends
    let out_dir: PathBuf = env::var("STORAGE_DEMO_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::current_dir()
                .expect("cwd")
                .join("target")
                .join("storage_demo")
        });
    fs::create_dir_all(&out_dir).expect("create output dir");

    let storage_mem = MemoryStorage::new();

    let storage_fs = if env::var("SHOPKEEP_STORE_DIR").is_ok() {
        info!("Using FileStorage::new_default() with SHOPKEEP_STORE_DIR");
        FileStorage::new_default().expect("create file storage (env)")
    } else {
        let json_path = out_dir.join("products.json");
        info!(
            "Using FileStorage at {} (no SHOPKEEP_STORE_DIR)",
            json_path.display()
        );
        FileStorage::new(&json_path).expect("create file storage (path)")
    };

    let db_path = out_dir.join("storage_demo.sqlite3");
    info!("Using DatabaseStorage at {}", db_path.display());
    let storage_db = DatabaseStorage::new_file(&db_path).expect("create db");

    run_workflow("memory", &storage_mem);
    run_workflow("file", &storage_fs);
    run_workflow("database", &storage_db);

    // The same workflow must leave every backend with the same catalog shape
    let from_fs = storage_fs.list_products().expect("list fs");
    let from_db = storage_db.list_products().expect("list db");
    if from_fs.len() != from_db.len() {
        warn!(
            "File and database catalogs differ in size ({} vs {})",
            from_fs.len(),
            from_db.len()
        );
    }

    info!("Demo complete. Inspect files under: {}", out_dir.display());
}
