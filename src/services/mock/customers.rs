use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::customer::{
    Customer, CustomerCreateRequest, CustomerExport, CustomerFilters, CustomerStatus,
    CustomerUpdateRequest,
};
use crate::services::CustomerService;
use crate::utils::utc_now;

use super::{demo_customer_id, demo_tenant_id};

pub struct MockCustomerService {
    customers: RwLock<Vec<Customer>>,
}

impl MockCustomerService {
    pub fn seeded() -> Self {
        let tenant = demo_tenant_id();
        let now = utc_now();
        let seed = |id: Uuid, name: &str, email: &str, industry: &str, status: CustomerStatus| {
            Customer {
                id,
                tenant_id: tenant,
                name: name.to_string(),
                email: email.to_string(),
                phone: None,
                industry: Some(industry.to_string()),
                status,
                created_at: now,
                updated_at: now,
            }
        };

        let customers = vec![
            seed(
                demo_customer_id(),
                "Acme Corp",
                "contact@acme.example",
                "manufacturing",
                CustomerStatus::Active,
            ),
            seed(
                Uuid::from_u128(0x2000_0000_0000_0000_0000_0000_0000_0002),
                "Globex",
                "hello@globex.example",
                "energy",
                CustomerStatus::Prospect,
            ),
            seed(
                Uuid::from_u128(0x2000_0000_0000_0000_0000_0000_0000_0003),
                "Initech",
                "sales@initech.example",
                "software",
                CustomerStatus::Churned,
            ),
        ];

        Self {
            customers: RwLock::new(customers),
        }
    }
}

#[async_trait]
impl CustomerService for MockCustomerService {
    async fn get_customers(&self, filters: CustomerFilters) -> AppResult<Vec<Customer>> {
        let guard = self.customers.read().await;
        let needle = filters.search.as_deref().map(|s| s.to_lowercase());

        Ok(guard
            .iter()
            .filter(|c| {
                needle.as_deref().map_or(true, |n| {
                    c.name.to_lowercase().contains(n) || c.email.to_lowercase().contains(n)
                })
            })
            .filter(|c| {
                filters
                    .industry
                    .as_deref()
                    .map_or(true, |i| c.industry.as_deref() == Some(i))
            })
            .filter(|c| filters.status.map_or(true, |s| c.status == s))
            .cloned()
            .collect())
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        let guard = self.customers.read().await;
        guard
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("customer not found"))
    }

    async fn create_customer(
        &self,
        data: CustomerCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<Customer> {
        let mut guard = self.customers.write().await;
        if guard.iter().any(|c| c.email.eq_ignore_ascii_case(&data.email)) {
            return Err(AppError::conflict("customer email already exists"));
        }

        let now = utc_now();
        let customer = Customer {
            id: Uuid::new_v4(),
            tenant_id,
            name: data.name,
            email: data.email,
            phone: data.phone,
            industry: data.industry,
            status: CustomerStatus::Prospect,
            created_at: now,
            updated_at: now,
        };
        guard.push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, id: Uuid, data: CustomerUpdateRequest) -> AppResult<Customer> {
        let mut guard = self.customers.write().await;
        let customer = guard
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("customer not found"))?;

        if let Some(name) = data.name {
            customer.name = name;
        }
        if let Some(email) = data.email {
            customer.email = email;
        }
        if let Some(phone) = data.phone {
            customer.phone = Some(phone);
        }
        if let Some(industry) = data.industry {
            customer.industry = Some(industry);
        }
        if let Some(status) = data.status {
            customer.status = status;
        }
        customer.updated_at = utc_now();

        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<()> {
        let mut guard = self.customers.write().await;
        let before = guard.len();
        guard.retain(|c| c.id != id);
        if guard.len() == before {
            return Err(AppError::not_found("customer not found"));
        }
        Ok(())
    }

    async fn bulk_delete_customers(&self, ids: Vec<Uuid>) -> AppResult<u64> {
        let mut guard = self.customers.write().await;
        let before = guard.len();
        guard.retain(|c| !ids.contains(&c.id));
        Ok((before - guard.len()) as u64)
    }

    async fn export_customers(&self) -> AppResult<CustomerExport> {
        let guard = self.customers.read().await;
        let mut csv = String::from("id,name,email,industry,status\n");
        for c in guard.iter() {
            csv.push_str(&format!(
                "{},{},{},{},{:?}\n",
                c.id,
                c.name,
                c.email,
                c.industry.as_deref().unwrap_or(""),
                c.status
            ));
        }
        Ok(CustomerExport {
            generated_at: utc_now(),
            count: guard.len(),
            csv,
        })
    }

    async fn get_industries(&self) -> AppResult<Vec<String>> {
        let guard = self.customers.read().await;
        let mut industries: Vec<String> = guard
            .iter()
            .filter_map(|c| c.industry.clone())
            .collect();
        industries.sort();
        industries.dedup();
        Ok(industries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_by_search_and_status() {
        let service = MockCustomerService::seeded();

        let all = service.get_customers(CustomerFilters::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let acme = service
            .get_customers(CustomerFilters {
                search: Some("acme".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(acme.len(), 1);
        assert_eq!(acme[0].name, "Acme Corp");

        let churned = service
            .get_customers(CustomerFilters {
                status: Some(CustomerStatus::Churned),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(churned.len(), 1);
    }

    #[tokio::test]
    async fn bulk_delete_skips_missing_ids() {
        let service = MockCustomerService::seeded();
        let deleted = service
            .bulk_delete_customers(vec![demo_customer_id(), Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(
            service.get_customers(CustomerFilters::default()).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn industries_are_distinct_and_sorted() {
        let service = MockCustomerService::seeded();
        let industries = service.get_industries().await.unwrap();
        assert_eq!(industries, vec!["energy", "manufacturing", "software"]);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let service = MockCustomerService::seeded();
        let err = service
            .create_customer(
                CustomerCreateRequest {
                    name: "Acme Again".into(),
                    email: "contact@acme.example".into(),
                    phone: None,
                    industry: None,
                },
                demo_tenant_id(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
