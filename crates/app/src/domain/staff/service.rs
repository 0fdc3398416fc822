//! Staff service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::staff::{
        errors::StaffServiceError,
        models::{
            NewStaff, PermissionsUpdate, StaffFilters, StaffProfileUpdate, StaffRecord,
            StaffRole, StaffStats,
        },
        repository::PgStaffRepository,
    },
    ids::{RestaurantId, StaffId},
};

#[derive(Debug, Clone)]
pub struct PgStaffService {
    db: Db,
    repository: PgStaffRepository,
}

impl PgStaffService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgStaffRepository::new(),
        }
    }
}

fn validate_email(email: &str) -> Result<(), StaffServiceError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if well_formed {
        Ok(())
    } else {
        Err(StaffServiceError::InvalidEmail(email.to_string()))
    }
}

#[async_trait]
impl StaffService for PgStaffService {
    async fn list_staff(
        &self,
        restaurant: RestaurantId,
        filters: StaffFilters,
    ) -> Result<Vec<StaffRecord>, StaffServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let staff = self.repository.list_staff(&mut tx, filters).await?;

        tx.commit().await?;

        Ok(staff)
    }

    async fn get_staff(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
    ) -> Result<StaffRecord, StaffServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let record = self.repository.get_staff(&mut tx, staff).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_by_email(
        &self,
        restaurant: RestaurantId,
        email: &str,
    ) -> Result<Option<StaffRecord>, StaffServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let record = self.repository.find_by_email(&mut tx, email).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self, staff), fields(%restaurant, staff = %staff.uuid))]
    async fn create_staff(
        &self,
        restaurant: RestaurantId,
        staff: NewStaff,
    ) -> Result<StaffRecord, StaffServiceError> {
        validate_email(&staff.email)?;

        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let created = self.repository.create_staff(&mut tx, staff).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self, update), fields(%restaurant, %staff))]
    async fn update_profile(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
        update: StaffProfileUpdate,
    ) -> Result<StaffRecord, StaffServiceError> {
        if let Some(email) = &update.email {
            validate_email(email)?;
        }

        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self.repository.update_profile(&mut tx, staff, update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(%restaurant, %staff, %role))]
    async fn update_role(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
        role: StaffRole,
    ) -> Result<StaffRecord, StaffServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self.repository.update_role(&mut tx, staff, role).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self, update), fields(%restaurant, %staff))]
    async fn update_permissions(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
        update: PermissionsUpdate,
    ) -> Result<StaffRecord, StaffServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self
            .repository
            .update_permissions(&mut tx, staff, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(%restaurant, %staff, active))]
    async fn set_active(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
        acting: StaffId,
        active: bool,
    ) -> Result<StaffRecord, StaffServiceError> {
        if !active && staff == acting {
            return Err(StaffServiceError::SelfDeactivation);
        }

        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self.repository.set_active(&mut tx, staff, active).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn record_login(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
    ) -> Result<StaffRecord, StaffServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let updated = self.repository.touch_last_login(&mut tx, staff).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn staff_stats(
        &self,
        restaurant: RestaurantId,
    ) -> Result<StaffStats, StaffServiceError> {
        let mut tx = self.db.begin_restaurant_transaction(restaurant).await?;

        let staff = self
            .repository
            .list_staff(&mut tx, StaffFilters::default())
            .await?;

        tx.commit().await?;

        let mut stats = StaffStats::default();

        for record in &staff {
            stats.total += 1;

            if record.role.is_admin() {
                stats.admins += 1;
            } else {
                stats.members += 1;
            }

            if record.is_active {
                stats.active += 1;
            }
        }

        Ok(stats)
    }
}

#[automock]
#[async_trait]
/// Staff account management for one restaurant.
pub trait StaffService: Send + Sync {
    /// Lists staff matching the given filters.
    async fn list_staff(
        &self,
        restaurant: RestaurantId,
        filters: StaffFilters,
    ) -> Result<Vec<StaffRecord>, StaffServiceError>;

    /// Retrieves one staff member.
    async fn get_staff(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
    ) -> Result<StaffRecord, StaffServiceError>;

    /// Looks a staff member up by email within the restaurant.
    async fn find_by_email(
        &self,
        restaurant: RestaurantId,
        email: &str,
    ) -> Result<Option<StaffRecord>, StaffServiceError>;

    /// Creates a new staff account.
    async fn create_staff(
        &self,
        restaurant: RestaurantId,
        staff: NewStaff,
    ) -> Result<StaffRecord, StaffServiceError>;

    /// Updates name and email; the email must stay unique per restaurant.
    async fn update_profile(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
        update: StaffProfileUpdate,
    ) -> Result<StaffRecord, StaffServiceError>;

    /// Changes a staff member's role.
    async fn update_role(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
        role: StaffRole,
    ) -> Result<StaffRecord, StaffServiceError>;

    /// Applies a partial permissions update.
    async fn update_permissions(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
        update: PermissionsUpdate,
    ) -> Result<StaffRecord, StaffServiceError>;

    /// Activates or deactivates an account. Staff cannot deactivate
    /// themselves.
    async fn set_active(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
        acting: StaffId,
        active: bool,
    ) -> Result<StaffRecord, StaffServiceError>;

    /// Stamps the account's last login time.
    async fn record_login(
        &self,
        restaurant: RestaurantId,
        staff: StaffId,
    ) -> Result<StaffRecord, StaffServiceError>;

    /// Headcount summary across roles and active state.
    async fn staff_stats(
        &self,
        restaurant: RestaurantId,
    ) -> Result<StaffStats, StaffServiceError>;
}
