//! 管理面板操作
//!
//! Every operation checks the gate first, validates, builds the new
//! collection and hands it to the write-through commit. The cache only
//! changes after the store accepted the new value.

use shared::models::{
    ALL_CATEGORY_ID, ALL_WEEKDAYS, Category, CategoryInput, GlobalSettings, MenuItem,
    MenuItemUpdate, Restaurant, User, UserRole,
};
use shared::util::{new_id, slugify};

use crate::auth::{CurrentUser, gate, permissions};
use crate::core::StorefrontState;
use crate::utils::time::parse_hhmm;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const DEFAULT_STORE_IMAGE: &str = "https://images.unsplash.com/photo-1513104890138-7c749659a591?w=800";
const DEFAULT_ITEM_IMAGE: &str = "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=400";

/// Fresh restaurant form with the panel's defaults, not yet saved
pub fn restaurant_draft(settings: &GlobalSettings) -> Restaurant {
    let category = settings
        .categories()
        .iter()
        .find(|c| !c.is_sentinel())
        .map(|c| c.id.clone())
        .unwrap_or_else(|| "snacks".into());
    Restaurant {
        id: new_id(),
        name: String::new(),
        rating: 5.0,
        delivery_time: "30-45 min".into(),
        delivery_fee: 5.0,
        opening_time: "08:00".into(),
        closing_time: "22:00".into(),
        opening_time2: None,
        closing_time2: None,
        operating_days: Some(ALL_WEEKDAYS.to_vec()),
        price_per_km: None,
        vehicle_model: None,
        category,
        image: DEFAULT_STORE_IMAGE.into(),
        menu: Vec::new(),
        whatsapp_number: Some(String::new()),
        active: Some(true),
    }
}

fn validate_restaurant(restaurant: &Restaurant) -> AppResult<()> {
    validate_required_text(&restaurant.name, "name", MAX_NAME_LEN)?;
    validate_required_text(
        restaurant.whatsapp_number.as_deref().unwrap_or_default(),
        "whatsappNumber",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_amount(restaurant.delivery_fee, "deliveryFee")?;
    if let Some(per_km) = restaurant.price_per_km {
        validate_amount(per_km, "pricePerKm")?;
    }
    validate_optional_text(&restaurant.vehicle_model, "vehicleModel", MAX_NAME_LEN)?;
    for (field, value) in [
        ("openingTime", Some(restaurant.opening_time.as_str())),
        ("closingTime", Some(restaurant.closing_time.as_str())),
        ("openingTime2", restaurant.opening_time2.as_deref()),
        ("closingTime2", restaurant.closing_time2.as_deref()),
    ] {
        if let Some(v) = value
            && !v.trim().is_empty()
            && parse_hhmm(v).is_none()
        {
            return Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("{field} must be HH:MM, got '{v}'"),
            )
            .with_detail("field", field));
        }
    }
    if let Some(days) = &restaurant.operating_days
        && days.iter().any(|d| *d > 6)
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "operatingDays must be within 0..=6",
        )
        .with_detail("field", "operatingDays"));
    }
    for item in &restaurant.menu {
        validate_menu_item(item)?;
    }
    Ok(())
}

fn validate_menu_item(item: &MenuItem) -> AppResult<()> {
    validate_required_text(&item.name, "name", MAX_NAME_LEN)?;
    if item.description.len() > MAX_NOTE_LEN {
        return Err(AppError::validation("description is too long").with_detail("field", "description"));
    }
    validate_amount(item.price, "price")
}

impl StorefrontState {
    // ========== Restaurants ==========

    /// Start a new restaurant form (admin only)
    pub fn new_restaurant(&self, actor: Option<&CurrentUser>) -> AppResult<Restaurant> {
        gate::require_permission(actor, permissions::RESTAURANTS_CREATE)?;
        Ok(restaurant_draft(&self.settings()))
    }

    /// Restaurants listed in the management panel (admin: all, manager: own)
    pub fn panel_restaurants(&self, actor: Option<&CurrentUser>) -> AppResult<Vec<Restaurant>> {
        gate::require_permission(actor, permissions::RESTAURANTS_UPDATE)?;
        let restaurants = self.restaurants();
        Ok(gate::managed_restaurants(actor, &restaurants)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Create or replace a restaurant. With `second_shift` off the second
    /// pair of times is dropped. New restaurants go first in the list.
    pub async fn save_restaurant(
        &self,
        actor: Option<&CurrentUser>,
        mut restaurant: Restaurant,
        second_shift: bool,
    ) -> AppResult<Restaurant> {
        if !second_shift {
            restaurant.opening_time2 = None;
            restaurant.closing_time2 = None;
        }
        if let Some(days) = restaurant.operating_days.as_mut() {
            days.sort_unstable();
            days.dedup();
        }
        validate_restaurant(&restaurant)?;

        let mut restaurants = self.restaurants();
        match restaurants.iter().position(|r| r.id == restaurant.id) {
            Some(index) => {
                gate::require_permission(actor, permissions::RESTAURANTS_UPDATE)?;
                let user = gate::require_user(actor)?;
                gate::require_restaurant_scope(user, &restaurant.id)?;
                if restaurants[index].delivery_fee != restaurant.delivery_fee
                    && !gate::can_change_delivery_fee(actor)
                {
                    return Err(AppError::new(ErrorCode::DeliveryFeeLocked)
                        .with_detail("restaurantId", restaurant.id.as_str()));
                }
                restaurants[index] = restaurant.clone();
            }
            None => {
                gate::require_permission(actor, permissions::RESTAURANTS_CREATE)?;
                restaurants.insert(0, restaurant.clone());
            }
        }

        self.commit_restaurants(restaurants).await?;
        tracing::info!(restaurant_id = %restaurant.id, name = %restaurant.name, "Restaurant saved");
        Ok(restaurant)
    }

    pub async fn delete_restaurant(&self, actor: Option<&CurrentUser>, restaurant_id: &str) -> AppResult<()> {
        gate::require_permission(actor, permissions::RESTAURANTS_DELETE)?;
        let mut restaurants = self.restaurants();
        let before = restaurants.len();
        restaurants.retain(|r| r.id != restaurant_id);
        if restaurants.len() == before {
            return Err(restaurant_not_found(restaurant_id));
        }
        self.commit_restaurants(restaurants).await?;
        tracing::info!(restaurant_id, "Restaurant deleted");
        Ok(())
    }

    // ========== Menu ==========

    /// Append a menu item; blank fields get the panel's placeholders
    pub async fn add_menu_item(
        &self,
        actor: Option<&CurrentUser>,
        restaurant_id: &str,
        draft: MenuItemUpdate,
    ) -> AppResult<MenuItem> {
        let item = MenuItem {
            id: new_id(),
            name: draft.name.unwrap_or_else(|| "Novo Item".into()),
            description: draft.description.unwrap_or_else(|| "Descrição aqui".into()),
            price: draft.price.unwrap_or(0.0),
            image: draft.image.unwrap_or_else(|| DEFAULT_ITEM_IMAGE.into()),
            popular: draft.popular,
            active: Some(draft.active.unwrap_or(true)),
        };
        validate_menu_item(&item)?;

        let created = item.clone();
        self.edit_menu(actor, restaurant_id, move |menu| {
            menu.push(item);
            Ok(())
        })
        .await?;
        tracing::info!(restaurant_id, item_id = %created.id, "Menu item added");
        Ok(created)
    }

    pub async fn update_menu_item(
        &self,
        actor: Option<&CurrentUser>,
        restaurant_id: &str,
        item_id: &str,
        update: MenuItemUpdate,
    ) -> AppResult<MenuItem> {
        let mut updated = None;
        self.edit_menu(actor, restaurant_id, |menu| {
            let item = menu
                .iter_mut()
                .find(|i| i.id == item_id)
                .ok_or_else(|| menu_item_not_found(item_id))?;
            if let Some(name) = update.name {
                item.name = name;
            }
            if let Some(description) = update.description {
                item.description = description;
            }
            if let Some(price) = update.price {
                item.price = price;
            }
            if let Some(image) = update.image {
                item.image = image;
            }
            if update.popular.is_some() {
                item.popular = update.popular;
            }
            if update.active.is_some() {
                item.active = update.active;
            }
            validate_menu_item(item)?;
            updated = Some(item.clone());
            Ok(())
        })
        .await?;
        updated.ok_or_else(|| menu_item_not_found(item_id))
    }

    pub async fn delete_menu_item(
        &self,
        actor: Option<&CurrentUser>,
        restaurant_id: &str,
        item_id: &str,
    ) -> AppResult<()> {
        self.edit_menu(actor, restaurant_id, |menu| {
            let before = menu.len();
            menu.retain(|i| i.id != item_id);
            if menu.len() == before {
                return Err(menu_item_not_found(item_id));
            }
            Ok(())
        })
        .await?;
        tracing::info!(restaurant_id, item_id, "Menu item deleted");
        Ok(())
    }

    async fn edit_menu<F>(&self, actor: Option<&CurrentUser>, restaurant_id: &str, edit: F) -> AppResult<()>
    where
        F: FnOnce(&mut Vec<MenuItem>) -> AppResult<()>,
    {
        gate::require_permission(actor, permissions::MENU_MANAGE)?;
        let user = gate::require_user(actor)?;
        gate::require_restaurant_scope(user, restaurant_id)?;

        let mut restaurants = self.restaurants();
        let restaurant = restaurants
            .iter_mut()
            .find(|r| r.id == restaurant_id)
            .ok_or_else(|| restaurant_not_found(restaurant_id))?;
        edit(&mut restaurant.menu)?;
        self.commit_restaurants(restaurants).await
    }

    // ========== Users ==========

    /// Create or replace a user record (admin only). New users are appended.
    pub async fn save_user(&self, actor: Option<&CurrentUser>, user: User) -> AppResult<User> {
        gate::require_permission(actor, permissions::USERS_MANAGE)?;
        validate_required_text(&user.username, "username", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&user.password, "password", MAX_PASSWORD_LEN)?;
        validate_optional_text(&user.whatsapp_number, "whatsappNumber", MAX_SHORT_TEXT_LEN)?;
        if user.role == UserRole::Manager && user.restaurant_id.as_deref().is_none_or(str::is_empty) {
            return Err(AppError::required("restaurantId"));
        }

        let mut users = self.users();
        if users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(AppError::new(ErrorCode::UsernameTaken).with_detail("username", user.username));
        }
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }

        self.commit_users(users).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User saved");
        Ok(user)
    }

    pub async fn delete_user(&self, actor: Option<&CurrentUser>, user_id: &str) -> AppResult<()> {
        gate::require_permission(actor, permissions::USERS_MANAGE)?;
        let mut users = self.users();
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(AppError::new(ErrorCode::UserNotFound).with_detail("userId", user_id));
        }
        self.commit_users(users).await?;
        tracing::info!(user_id, "User deleted");
        Ok(())
    }

    // ========== Categories ==========

    /// Create (`editing_id` = None, id slugged from the name) or rename a category
    pub async fn save_category(
        &self,
        actor: Option<&CurrentUser>,
        editing_id: Option<&str>,
        input: CategoryInput,
    ) -> AppResult<Category> {
        gate::require_permission(actor, permissions::CATEGORIES_MANAGE)?;
        validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&input.icon, "icon", MAX_SHORT_TEXT_LEN)?;

        let mut settings = self.settings();
        let mut categories = settings.categories().to_vec();
        let saved = match editing_id {
            Some(id) if id == ALL_CATEGORY_ID => return Err(category_protected()),
            Some(id) => {
                let category = categories
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| category_not_found(id))?;
                category.name = input.name;
                category.icon = input.icon;
                category.clone()
            }
            None => {
                let id = slugify(&input.name);
                if categories.iter().any(|c| c.id == id) {
                    return Err(AppError::new(ErrorCode::CategoryNameExists).with_detail("categoryId", id));
                }
                let category = Category::new(id, input.name, input.icon);
                categories.push(category.clone());
                category
            }
        };

        settings.categories = Some(categories);
        self.commit_settings(settings).await?;
        tracing::info!(category_id = %saved.id, "Category saved");
        Ok(saved)
    }

    pub async fn delete_category(&self, actor: Option<&CurrentUser>, category_id: &str) -> AppResult<()> {
        gate::require_permission(actor, permissions::CATEGORIES_MANAGE)?;
        if category_id == ALL_CATEGORY_ID {
            return Err(category_protected());
        }
        let mut settings = self.settings();
        let mut categories = settings.categories().to_vec();
        let before = categories.len();
        categories.retain(|c| c.id != category_id);
        if categories.len() == before {
            return Err(category_not_found(category_id));
        }
        settings.categories = Some(categories);
        self.commit_settings(settings).await?;
        tracing::info!(category_id, "Category deleted");
        Ok(())
    }

    // ========== Settings ==========

    /// Replace the settings singleton wholesale
    pub async fn save_settings(&self, actor: Option<&CurrentUser>, settings: GlobalSettings) -> AppResult<()> {
        gate::require_permission(actor, permissions::SETTINGS_MANAGE)?;
        validate_amount(settings.site_fee, "siteFee")?;
        validate_amount(settings.app_fee, "appFee")?;
        validate_amount(settings.min_order_value, "minOrderValue")?;
        if !settings.categories().iter().any(Category::is_sentinel) {
            return Err(category_protected());
        }
        self.commit_settings(settings).await?;
        tracing::info!("Settings saved");
        Ok(())
    }
}

fn restaurant_not_found(restaurant_id: &str) -> AppError {
    AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurantId", restaurant_id)
}

fn menu_item_not_found(item_id: &str) -> AppError {
    AppError::new(ErrorCode::MenuItemNotFound).with_detail("itemId", item_id)
}

fn category_not_found(category_id: &str) -> AppError {
    AppError::new(ErrorCode::CategoryNotFound).with_detail("categoryId", category_id)
}

fn category_protected() -> AppError {
    AppError::new(ErrorCode::CategoryProtected).with_detail("categoryId", ALL_CATEGORY_ID)
}
