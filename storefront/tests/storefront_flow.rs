//! End-to-end: customer order from browse to drop-off, across a store reopen

use std::sync::Arc;

use shared::models::{AddressInput, RegisterInput, User, UserRole};
use shared::order::{OrderType, PaymentMethod};
use shared::{ErrorCode, OrderStatus};
use storefront::services::OfflineAssistant;
use storefront::services::handoff;
use storefront::{
    AppAction, AppState, AppView, Config, ConflictResolution, CurrentUser, OrderAction, RedbStore,
    StorefrontState, reduce,
};

async fn open_state(dir: &tempfile::TempDir) -> StorefrontState {
    let config = Config::with_work_dir(dir.path().to_string_lossy().to_string());
    let store = RedbStore::open(config.database_path()).unwrap();
    StorefrontState::with_store(config, Arc::new(store), Arc::new(OfflineAssistant))
        .await
        .unwrap()
}

fn staff(id: &str, username: &str, role: UserRole) -> User {
    User {
        id: id.into(),
        name: username.into(),
        username: username.into(),
        password: "123".into(),
        role,
        whatsapp_number: None,
        addresses: None,
        restaurant_id: (role == UserRole::Manager).then(|| "1".to_string()),
        courier_restaurant_ids: (role == UserRole::Courier).then(|| vec!["1".to_string()]),
    }
}

#[tokio::test]
async fn test_order_flow_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir).await;

    // admin sets up staff and round-the-clock hours
    let admin = CurrentUser::from(&state.login("admin", "123").await.unwrap());
    let manager = staff("m1", "gerente", UserRole::Manager);
    let courier = staff("c1", "caio", UserRole::Courier);
    let rival = staff("c2", "davi", UserRole::Courier);
    for user in [&manager, &courier, &rival] {
        state.save_user(Some(&admin), user.clone()).await.unwrap();
    }
    let mut restaurant = state.restaurant("1").unwrap();
    restaurant.opening_time = "00:00".into();
    restaurant.closing_time = "23:59".into();
    state
        .save_restaurant(Some(&admin), restaurant, false)
        .await
        .unwrap();
    state.logout().await;

    // customer registers and adds an address
    let ana = state
        .register(RegisterInput {
            name: "Ana".into(),
            username: "ana".into(),
            password: "segredo".into(),
            whatsapp_number: "5588999990000".into(),
        })
        .await
        .unwrap();
    let ana_actor = CurrentUser::from(&ana);
    let ana = state
        .add_address(
            Some(&ana_actor),
            &ana.id,
            AddressInput {
                label: None,
                street: "Rua A".into(),
                number: "10".into(),
                neighborhood: "Centro".into(),
                city: None,
                complement: None,
            },
        )
        .await
        .unwrap();

    // browse → cart → checkout
    let restaurant = state.restaurant("1").unwrap();
    let mut app = reduce(AppState::default(), AppAction::SignedIn(ana.clone()));
    app = reduce(app, AppAction::OpenRestaurant(restaurant.clone()));
    for id in ["b1", "b2", "b2"] {
        let item = restaurant.menu_item(id).unwrap().clone();
        app = reduce(
            app,
            AppAction::AddToCart {
                item,
                on_conflict: ConflictResolution::KeepCart,
            },
        );
    }
    assert_eq!(app.cart.totals(OrderType::Pickup, restaurant.delivery_fee).total, 61.0);

    app = reduce(app, AppAction::ProceedToCheckout);
    let err = state.confirm_order(&app).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PaymentMethodRequired);

    app = reduce(app, AppAction::SetPaymentMethod(PaymentMethod::Cash));
    let order = state.confirm_order(&app).await.unwrap();
    app = reduce(app, AppAction::OrderPlaced(order.clone()));
    assert_eq!(app.view, AppView::Success);
    assert!(app.cart.is_empty());
    assert_eq!(order.total, 66.0);
    assert_eq!(order.customer_id, ana.id);
    assert_eq!(order.customer_address.describe(), "Rua A, 10 - Centro");

    let link = handoff::order_link(&order, &restaurant).unwrap();
    assert_eq!(link.path(), "/5598912345678");

    // store and couriers move it along
    let manager = CurrentUser::from(&manager);
    let courier = CurrentUser::from(&courier);
    let rival = CurrentUser::from(&rival);
    for action in [OrderAction::Accept, OrderAction::MarkReady] {
        state
            .advance_order(Some(&manager), &order.id, action)
            .await
            .unwrap();
    }
    let board = state.courier_dashboard(Some(&rival)).await.unwrap();
    assert_eq!(board.available.len(), 1);

    state
        .advance_order(Some(&courier), &order.id, OrderAction::Claim)
        .await
        .unwrap();
    let err = state
        .advance_order(Some(&rival), &order.id, OrderAction::Claim)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderAlreadyClaimed);
    let err = state
        .advance_order(Some(&manager), &order.id, OrderAction::Cancel)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    for action in [OrderAction::ConfirmPickup, OrderAction::Complete] {
        state
            .advance_order(Some(&courier), &order.id, action)
            .await
            .unwrap();
    }
    drop(state);

    // everything is still there after reopening the file
    let state = open_state(&dir).await;
    let history = state.customer_history(Some(&ana_actor)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].order.status, OrderStatus::Completed);
    assert_eq!(history[0].order.courier_id.as_deref(), Some("c1"));
    assert_eq!(history[0].status.label, "Entregue");
    assert_eq!(state.users().len(), 5);
    assert_eq!(state.restaurant("1").unwrap().opening_time, "00:00");
}
