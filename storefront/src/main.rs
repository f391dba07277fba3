use anyhow::Context;
use shared::models::ALL_CATEGORY_ID;
use storefront::{StorefrontState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境 (dotenv, 工作目录, 日志)
    let config = setup_environment().context("failed to prepare environment")?;
    print_banner();
    tracing::info!(work_dir = %config.work_dir, timezone = %config.timezone, "Volpony storefront starting");

    // 2. 状态 (数据库, 缓存, 助手)
    let state = StorefrontState::initialize(&config)
        .await
        .context("failed to initialize storefront")?;

    if let Some(user) = state.restore_session().await {
        tracing::info!(user_id = %user.id, role = %user.role, "Session restored");
    }

    // 3. 首页列表
    let online = if state.cloud_status() { "online" } else { "offline" };
    println!("Volpony Delivery ({online})");
    for card in state.home_cards(ALL_CATEGORY_ID) {
        let badge = if card.is_open { "ABERTO" } else { "FECHADO" };
        let free = if card.free_delivery { " · Entrega Grátis" } else { "" };
        println!(
            "[{badge}] {} · {} · {} · {}{free}",
            card.name, card.subtitle, card.delivery_time, card.fee_text
        );
    }

    Ok(())
}
