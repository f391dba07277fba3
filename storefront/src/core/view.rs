//! 前台会话状态
//!
//! Everything one client session holds between interactions: which screen
//! is showing, the cart, checkout choices and the signed-in user. The state
//! is a plain value and [`reduce`] is the only way to change it.

use shared::models::{Address, MenuItem, Restaurant, User, ALL_CATEGORY_ID};
use shared::order::{OrderType, PaymentMethod};
use shared::Order;

use crate::cart::{AddOutcome, Cart, ConflictResolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Home,
    RestaurantDetails,
    Checkout,
    Success,
    Login,
    AdminPanel,
    CustomerDashboard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub view: AppView,
    pub selected_category: String,
    pub selected_restaurant: Option<Restaurant>,
    pub cart: Cart,
    pub cart_open: bool,
    pub order_type: OrderType,
    pub selected_address: Option<Address>,
    pub payment_method: Option<PaymentMethod>,
    pub current_user: Option<User>,
    pub last_order: Option<Order>,
    /// Result of the most recent add-to-cart
    pub last_add: Option<AddOutcome>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: AppView::Home,
            selected_category: ALL_CATEGORY_ID.to_string(),
            selected_restaurant: None,
            cart: Cart::new(),
            cart_open: false,
            order_type: OrderType::Delivery,
            selected_address: None,
            payment_method: None,
            current_user: None,
            last_order: None,
            last_add: None,
        }
    }
}

impl AppState {
    /// Restaurant the checkout is for: the cart's owner once it holds items,
    /// else the one on screen
    pub fn active_restaurant_id(&self) -> Option<&str> {
        self.cart
            .restaurant_id()
            .or_else(|| self.selected_restaurant.as_ref().map(|r| r.id.as_str()))
    }
}

#[derive(Debug, Clone)]
pub enum AppAction {
    GoHome,
    OpenLogin,
    OpenAdminPanel,
    OpenCustomerDashboard,
    SelectCategory(String),
    /// Opening a store resets the order type to delivery
    OpenRestaurant(Restaurant),
    BackToRestaurant,
    OpenCart,
    CloseCart,
    AddToCart {
        item: MenuItem,
        on_conflict: ConflictResolution,
    },
    UpdateQuantity {
        item_id: String,
        delta: i32,
    },
    RemoveFromCart(String),
    ProceedToCheckout,
    SetOrderType(OrderType),
    SelectAddress(Address),
    SetPaymentMethod(PaymentMethod),
    /// Login or registration finished
    SignedIn(User),
    /// Session marker resolved at start-up, stays on the current screen
    SessionRestored(User),
    /// Fresh copy of the signed-in user after an address book or profile edit
    UserRefreshed(User),
    SignedOut,
    OrderPlaced(Order),
}

/// Pure state transition: same input, same output, no I/O
pub fn reduce(mut state: AppState, action: AppAction) -> AppState {
    match action {
        AppAction::GoHome => state.view = AppView::Home,
        AppAction::OpenLogin => state.view = AppView::Login,
        AppAction::OpenAdminPanel => state.view = AppView::AdminPanel,
        AppAction::OpenCustomerDashboard => state.view = AppView::CustomerDashboard,
        AppAction::SelectCategory(id) => state.selected_category = id,
        AppAction::OpenRestaurant(restaurant) => {
            state.selected_restaurant = Some(restaurant);
            state.order_type = OrderType::Delivery;
            state.view = AppView::RestaurantDetails;
        }
        AppAction::BackToRestaurant => state.view = AppView::RestaurantDetails,
        AppAction::OpenCart => state.cart_open = true,
        AppAction::CloseCart => state.cart_open = false,
        AppAction::AddToCart { item, on_conflict } => {
            // 没有选中店铺时忽略
            if let Some(restaurant) = &state.selected_restaurant {
                let outcome = state.cart.add(restaurant, &item, on_conflict);
                if outcome != AddOutcome::Declined {
                    state.cart_open = true;
                }
                state.last_add = Some(outcome);
            }
        }
        AppAction::UpdateQuantity { item_id, delta } => {
            state.cart.update_quantity(&item_id, delta)
        }
        AppAction::RemoveFromCart(item_id) => state.cart.remove(&item_id),
        AppAction::ProceedToCheckout => {
            state.cart_open = false;
            state.view = AppView::Checkout;
        }
        AppAction::SetOrderType(order_type) => state.order_type = order_type,
        AppAction::SelectAddress(address) => state.selected_address = Some(address),
        AppAction::SetPaymentMethod(method) => state.payment_method = Some(method),
        AppAction::SignedIn(user) => {
            state = with_user(state, user);
            state.view = AppView::Home;
        }
        AppAction::SessionRestored(user) => state = with_user(state, user),
        AppAction::UserRefreshed(user) => {
            // 已选地址被删除时清空
            if let Some(selected) = &state.selected_address
                && !user.addresses().iter().any(|a| a.id == selected.id)
            {
                state.selected_address = None;
            }
            state = with_user(state, user);
        }
        AppAction::SignedOut => {
            state.current_user = None;
            state.selected_address = None;
            state.view = AppView::Home;
        }
        AppAction::OrderPlaced(order) => {
            state.last_order = Some(order);
            state.cart.clear();
            state.view = AppView::Success;
        }
    }
    state
}

/// Sign `user` in and preselect their first address when none is chosen
fn with_user(mut state: AppState, user: User) -> AppState {
    if state.selected_address.is_none() {
        state.selected_address = user.addresses().first().cloned();
    }
    state.current_user = Some(user);
    state
}
