use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::contract::{
    Contract, ContractCreateRequest, ContractStatus, ContractUpdateRequest,
};
use crate::services::ContractService;
use crate::utils::utc_now;

use super::{demo_customer_id, demo_tenant_id};

pub struct MockContractService {
    contracts: RwLock<Vec<Contract>>,
}

impl MockContractService {
    pub fn seeded() -> Self {
        let now = utc_now();
        let contracts = vec![
            Contract {
                id: Uuid::from_u128(0x6000_0000_0000_0000_0000_0000_0000_0001),
                tenant_id: demo_tenant_id(),
                customer_id: demo_customer_id(),
                title: "Annual support agreement".into(),
                value: 12_000.0,
                status: ContractStatus::Active,
                starts_on: now - Duration::days(30),
                ends_on: Some(now + Duration::days(335)),
                created_at: now,
                updated_at: now,
            },
            Contract {
                id: Uuid::from_u128(0x6000_0000_0000_0000_0000_0000_0000_0002),
                tenant_id: demo_tenant_id(),
                customer_id: demo_customer_id(),
                title: "Expansion proposal".into(),
                value: 48_000.0,
                status: ContractStatus::PendingApproval,
                starts_on: now + Duration::days(14),
                ends_on: None,
                created_at: now,
                updated_at: now,
            },
        ];
        Self {
            contracts: RwLock::new(contracts),
        }
    }
}

#[async_trait]
impl ContractService for MockContractService {
    async fn get_contracts(&self) -> AppResult<Vec<Contract>> {
        Ok(self.contracts.read().await.clone())
    }

    async fn get_contract(&self, id: Uuid) -> AppResult<Contract> {
        self.contracts
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("contract not found"))
    }

    async fn create_contract(
        &self,
        data: ContractCreateRequest,
        tenant_id: Uuid,
    ) -> AppResult<Contract> {
        let now = utc_now();
        let contract = Contract {
            id: Uuid::new_v4(),
            tenant_id,
            customer_id: data.customer_id,
            title: data.title,
            value: data.value,
            status: ContractStatus::Draft,
            starts_on: data.starts_on,
            ends_on: data.ends_on,
            created_at: now,
            updated_at: now,
        };
        self.contracts.write().await.push(contract.clone());
        Ok(contract)
    }

    async fn update_contract(&self, id: Uuid, data: ContractUpdateRequest) -> AppResult<Contract> {
        let mut guard = self.contracts.write().await;
        let contract = guard
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("contract not found"))?;

        if let Some(title) = data.title {
            contract.title = title;
        }
        if let Some(value) = data.value {
            contract.value = value;
        }
        if let Some(ends_on) = data.ends_on {
            contract.ends_on = Some(ends_on);
        }
        contract.updated_at = utc_now();
        Ok(contract.clone())
    }

    async fn delete_contract(&self, id: Uuid) -> AppResult<()> {
        let mut guard = self.contracts.write().await;
        let before = guard.len();
        guard.retain(|c| c.id != id);
        if guard.len() == before {
            return Err(AppError::not_found("contract not found"));
        }
        Ok(())
    }

    async fn approve_contract(&self, id: Uuid) -> AppResult<Contract> {
        let mut guard = self.contracts.write().await;
        let contract = guard
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("contract not found"))?;

        if contract.status != ContractStatus::PendingApproval {
            return Err(AppError::conflict("contract is not pending approval"));
        }
        contract.status = ContractStatus::Active;
        contract.updated_at = utc_now();
        Ok(contract.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn approve_requires_pending_status() {
        let service = MockContractService::seeded();
        let contracts = service.get_contracts().await.unwrap();
        let active = contracts
            .iter()
            .find(|c| c.status == ContractStatus::Active)
            .unwrap();
        let pending = contracts
            .iter()
            .find(|c| c.status == ContractStatus::PendingApproval)
            .unwrap();

        let err = service.approve_contract(active.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let approved = service.approve_contract(pending.id).await.unwrap();
        assert_eq!(approved.status, ContractStatus::Active);
    }
}
