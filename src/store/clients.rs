use tracing::info;

use super::Store;
use crate::error::{Error, Result};
use crate::ids::generate_id;
use crate::model::{Client, ClientDraft, ClientPatch};
use crate::storage::{Storage, CLIENTS_KEY};
use crate::validation::validate_client;

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl<S: Storage> Store<S> {
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn add_client(&mut self, draft: ClientDraft) -> Result<String> {
        validate_client(&draft)?;

        let client = Client {
            id: generate_id(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            address: draft.address.trim().to_string(),
            phone: non_blank(draft.phone),
            company: non_blank(draft.company),
        };
        let id = client.id.clone();

        let mut next = self.clients.clone();
        next.push(client);
        self.commit(CLIENTS_KEY, next, |s, v| s.clients = v)?;
        info!(client_id = %id, "client created");
        Ok(id)
    }

    pub fn update_client(&mut self, id: &str, patch: ClientPatch) -> Result<()> {
        let mut next = self.clients.clone();
        let client = next
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found("client", id))?;
        patch.apply(client);
        validate_client(&ClientDraft {
            name: client.name.clone(),
            email: client.email.clone(),
            address: client.address.clone(),
            ..ClientDraft::default()
        })?;

        self.commit(CLIENTS_KEY, next, |s, v| s.clients = v)?;
        info!(client_id = %id, "client updated");
        Ok(())
    }

    /// Removes the client. Invoices keep their `client_id`; lookups then fall
    /// back to the "Unknown Client" label.
    pub fn delete_client(&mut self, id: &str) -> Result<()> {
        if self.client(id).is_none() {
            return Err(Error::not_found("client", id));
        }
        let next: Vec<Client> = self.clients.iter().filter(|c| c.id != id).cloned().collect();
        self.commit(CLIENTS_KEY, next, |s, v| s.clients = v)?;
        info!(client_id = %id, "client deleted");
        Ok(())
    }
}
