use tracing::info;

use super::Store;
use crate::error::{Error, Result};
use crate::ids::generate_id;
use crate::model::{Product, ProductDraft, ProductPatch};
use crate::storage::{Storage, PRODUCTS_KEY};
use crate::validation::validate_product;

impl<S: Storage> Store<S> {
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Validates the form and stores it under a fresh id.
    pub fn add_product(&mut self, draft: ProductDraft) -> Result<String> {
        validate_product(&draft)?;

        let product = Product {
            id: generate_id(),
            name: draft.name.trim().to_string(),
            price: draft.price,
            description: draft.description.filter(|d| !d.trim().is_empty()),
            unit: draft.unit.filter(|u| !u.trim().is_empty()),
        };
        let id = product.id.clone();

        let mut next = self.products.clone();
        next.push(product);
        self.commit(PRODUCTS_KEY, next, |s, v| s.products = v)?;
        info!(product_id = %id, "product created");
        Ok(id)
    }

    pub fn update_product(&mut self, id: &str, patch: ProductPatch) -> Result<()> {
        let mut next = self.products.clone();
        let product = next
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found("product", id))?;
        patch.apply(product);
        validate_product(&ProductDraft {
            name: product.name.clone(),
            price: product.price,
            ..ProductDraft::default()
        })?;

        self.commit(PRODUCTS_KEY, next, |s, v| s.products = v)?;
        info!(product_id = %id, "product updated");
        Ok(())
    }

    /// Removes the product. Invoice lines pointing at it are left as-is.
    pub fn delete_product(&mut self, id: &str) -> Result<()> {
        if self.product(id).is_none() {
            return Err(Error::not_found("product", id));
        }
        let next: Vec<Product> = self.products.iter().filter(|p| p.id != id).cloned().collect();
        self.commit(PRODUCTS_KEY, next, |s, v| s.products = v)?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{ProductDraft, ProductPatch};
    use crate::storage::{MemoryStorage, PRODUCTS_KEY};
    use crate::store::Store;

    fn draft(name: &str, price: f64) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            price,
            ..ProductDraft::default()
        }
    }

    #[test]
    fn zero_price_is_rejected_and_nothing_is_written() {
        let mut store = Store::open(MemoryStorage::new()).unwrap();
        let err = store.add_product(draft("Widget", 0.0)).unwrap_err();
        assert_eq!(
            err.validation_errors().and_then(|e| e.get("price")),
            Some("Price must be greater than zero")
        );
        assert!(store.products().is_empty());
        assert!(store.storage().raw(PRODUCTS_KEY).is_none());
    }

    #[test]
    fn created_product_is_retrievable_by_id() {
        let mut store = Store::open(MemoryStorage::new()).unwrap();
        let id = store.add_product(draft("Widget", 50.0)).unwrap();
        let product = store.product(&id).unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 50.0);
        assert!(store.storage().raw(PRODUCTS_KEY).unwrap().contains(&id));
    }

    #[test]
    fn invalid_update_leaves_product_untouched() {
        let mut store = Store::open(MemoryStorage::new()).unwrap();
        let id = store.add_product(draft("Widget", 50.0)).unwrap();
        let patch = ProductPatch {
            price: Some(-1.0),
            ..ProductPatch::default()
        };
        assert!(store.update_product(&id, patch).is_err());
        assert_eq!(store.product(&id).unwrap().price, 50.0);

        let patch = ProductPatch {
            unit: Some(Some("box".into())),
            ..ProductPatch::default()
        };
        store.update_product(&id, patch).unwrap();
        assert_eq!(store.product(&id).unwrap().unit.as_deref(), Some("box"));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut store = Store::open(MemoryStorage::new()).unwrap();
        assert!(store.delete_product("nope").is_err());
        assert!(store.update_product("nope", ProductPatch::default()).is_err());
    }
}
