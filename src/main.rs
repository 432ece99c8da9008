use std::sync::Arc;

use cart_store::cart_actor::Collaborators;
use cart_store::domain::{Cart, Product};
use cart_store::inventory::{HttpInventory, InventoryClient, InventoryHandle, InventoryService};
use cart_store::notify::TracingNotifier;
use cart_store::storage::{FileStore, MemoryStore, PersistentStore};
use cart_store::{setup_tracing, CartConfig, CartSystem};
use tracing::{info, Instrument};

/// Catalog served when no inventory URL is configured.
fn demo_catalog() -> Vec<(Product, u32)> {
    vec![
        (
            Product::new(
                1,
                "Tênis de Caminhada Leve Confortável",
                179.9,
                "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis1.jpg",
            ),
            5,
        ),
        (
            Product::new(
                2,
                "Tênis VR Caminhada Confortável Detalhes Couro Masculino",
                139.9,
                "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis2.jpg",
            ),
            3,
        ),
        (
            Product::new(
                3,
                "Tênis Adidas Duramo Lite 2.0",
                219.9,
                "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis3.jpg",
            ),
            2,
        ),
    ]
}

fn log_cart(cart: &Cart) {
    for item in cart {
        info!(
            product_id = item.id(),
            title = %item.product.title,
            amount = item.amount,
            subtotal = item.subtotal(),
            "Line item"
        );
    }
    info!(items = cart.len(), units = cart.total_units(), total = cart.total(), "Cart");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = CartConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting cart demo");

    let mut local_inventory: Option<InventoryHandle> = None;
    let inventory: Arc<dyn InventoryClient> = match &config.inventory_url {
        Some(url) => {
            let client = HttpInventory::new(url.clone(), config.inventory_timeout)
                .map_err(|e| e.to_string())?;
            Arc::new(client)
        }
        None => {
            let (mut service, handle) = InventoryService::new(config.mailbox_size);
            for (product, stock) in demo_catalog() {
                service = service.with_product(product, stock);
            }
            tokio::spawn(service.run());
            local_inventory = Some(handle.clone());
            Arc::new(handle)
        }
    };

    let store: Arc<dyn PersistentStore> = match &config.state_dir {
        Some(dir) => Arc::new(FileStore::open(dir.clone()).await.map_err(|e| e.to_string())?),
        None => Arc::new(MemoryStore::new()),
    };

    let collaborators = Collaborators {
        inventory,
        store,
        notifier: Arc::new(TracingNotifier),
    };
    let system = CartSystem::start(&config, collaborators).await.map_err(|e| e.to_string())?;
    let cart = system.client();
    let _observer = cart.on_change(|cart| {
        info!(items = cart.len(), units = cart.total_units(), "Cart changed");
    });

    let span = tracing::info_span!("shopping_session");
    async {
        // Failures are already reported through the notifier; the session goes on.
        let _ = cart.add_product(1).await;
        let _ = cart.add_product(1).await;
        let _ = cart.update_product_amount(1, 10).await;
        let _ = cart.add_product(3).await;
        let _ = cart.update_product_amount(3, 2).await;
        let _ = cart.remove_product(2).await;
        log_cart(&cart.snapshot());
        let _ = cart.remove_product(1).await;
    }
    .instrument(span)
    .await;

    let final_cart = cart.get_cart().await.map_err(|e| e.to_string())?;
    log_cart(&final_cart);

    system.shutdown().await.map_err(|e| e.to_string())?;
    if let Some(handle) = local_inventory {
        let _ = handle.shutdown().await;
    }

    info!("Cart demo completed successfully");
    Ok(())
}
