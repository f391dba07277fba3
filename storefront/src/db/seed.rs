//! 初始数据
//!
//! Returned by the store whenever a collection has never been saved.

use shared::models::{Category, FeeType, GlobalSettings, MenuItem, Restaurant, User, UserRole};

pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("all", "Tudo", "🍽️"),
        Category::new("snacks", "Lanches", "🍔"),
        Category::new("pizza", "Pizzaria", "🍕"),
        Category::new("pharmacy", "Farmácia", "💊"),
        Category::new("drinks", "Bebidas", "🥤"),
        Category::new("sweets", "Doces", "🍰"),
    ]
}

pub fn default_settings() -> GlobalSettings {
    GlobalSettings {
        site_fee: 0.0,
        app_fee: 0.0,
        min_order_value: 0.0,
        fee_type: FeeType::Fixed,
        categories: Some(default_categories()),
        logo: None,
    }
}

pub fn default_users() -> Vec<User> {
    vec![User {
        id: "admin1".into(),
        name: "Admin Volpony".into(),
        username: "admin".into(),
        password: "123".into(),
        role: UserRole::Admin,
        whatsapp_number: None,
        addresses: None,
        restaurant_id: None,
        courier_restaurant_ids: None,
    }]
}

pub fn default_restaurants() -> Vec<Restaurant> {
    vec![Restaurant {
        id: "1".into(),
        name: "Volpony Burguer".into(),
        rating: 4.9,
        delivery_time: "20-40 min".into(),
        delivery_fee: 5.0,
        opening_time: "18:00".into(),
        closing_time: "23:59".into(),
        opening_time2: None,
        closing_time2: None,
        operating_days: None,
        price_per_km: None,
        vehicle_model: None,
        category: "snacks".into(),
        image: "https://images.unsplash.com/photo-1550547660-d9450f859349?auto=format&fit=crop&w=800&q=80".into(),
        menu: vec![
            MenuItem {
                id: "b1".into(),
                name: "Volpony Classic".into(),
                description: "Blend 150g, queijo cheddar, alface e molho da casa.".into(),
                price: 25.0,
                image: "https://images.unsplash.com/photo-1568901346375-23c9450c58cd?auto=format&fit=crop&w=400&q=80".into(),
                popular: Some(true),
                active: Some(true),
            },
            MenuItem {
                id: "b2".into(),
                name: "Batata Rústica".into(),
                description: "Porção crocante com sal grosso e alecrim.".into(),
                price: 18.0,
                image: "https://images.unsplash.com/photo-1573080496219-bb080dd4f877?auto=format&fit=crop&w=400&q=80".into(),
                popular: None,
                active: Some(true),
            },
        ],
        whatsapp_number: Some("5598912345678".into()),
        active: Some(true),
    }]
}
