//! 订单状态显示
//!
//! Pure lookup from `(viewer, status, order type, service kind)` to the
//! label, icon and colour tone a front end renders. Customers, store staff
//! and couriers see different words for the same status; ride orders swap
//! delivery vocabulary for ride vocabulary.

use serde::Serialize;
use shared::order::{OrderStatus, OrderType, ServiceKind};
use shared::Order;

use super::lifecycle::OrderAction;

/// Who is looking at the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewer {
    Store,
    Customer,
    Courier,
}

/// Badge colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Yellow,
    Blue,
    Green,
    Orange,
    Purple,
    Gray,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusLabel {
    pub label: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
}

const fn label(label: &'static str, icon: &'static str, tone: Tone) -> StatusLabel {
    StatusLabel { label, icon, tone }
}

pub fn status_label(order: &Order, viewer: Viewer) -> StatusLabel {
    label_for(viewer, order.status, order.order_type, order.service)
}

pub fn label_for(
    viewer: Viewer,
    status: OrderStatus,
    order_type: OrderType,
    service: ServiceKind,
) -> StatusLabel {
    match viewer {
        Viewer::Store => store_label(status),
        Viewer::Customer => customer_label(status, order_type),
        Viewer::Courier => courier_label(status, service),
    }
}

fn store_label(status: OrderStatus) -> StatusLabel {
    match status {
        OrderStatus::Pending => label("Pendente", "clock", Tone::Yellow),
        OrderStatus::Preparing => label("Preparando", "chef-hat", Tone::Blue),
        OrderStatus::Ready => label("Pronto", "package", Tone::Green),
        OrderStatus::HeadingToPickup => label("Entregador a Caminho", "map-pin", Tone::Orange),
        OrderStatus::Delivering => label("Saiu p/ Entrega", "bike", Tone::Purple),
        OrderStatus::Completed => label("Concluído", "check-circle", Tone::Gray),
        OrderStatus::Cancelled => label("Cancelado", "x-circle", Tone::Red),
    }
}

fn customer_label(status: OrderStatus, order_type: OrderType) -> StatusLabel {
    match status {
        OrderStatus::Pending => label("Aguardando Loja", "clock", Tone::Yellow),
        OrderStatus::Preparing => label("Sendo Preparado", "chef-hat", Tone::Blue),
        OrderStatus::Ready => match order_type {
            OrderType::Delivery => label("Aguardando Entregador", "package", Tone::Orange),
            OrderType::Pickup => label("Pronto p/ Retirada", "package", Tone::Orange),
        },
        OrderStatus::HeadingToPickup => label("Entregador em Rota", "map-pin", Tone::Orange),
        OrderStatus::Delivering => label("Saiu p/ Entrega", "bike", Tone::Purple),
        OrderStatus::Completed => label("Entregue", "check-circle", Tone::Green),
        OrderStatus::Cancelled => label("Cancelado", "x-circle", Tone::Red),
    }
}

fn courier_label(status: OrderStatus, service: ServiceKind) -> StatusLabel {
    let ride = service == ServiceKind::Ride;
    match status {
        OrderStatus::Pending if ride => label("Corrida Solicitada", "check-circle", Tone::Green),
        OrderStatus::Ready if ride => label("Corrida Solicitada", "check-circle", Tone::Green),
        OrderStatus::Ready => label("Pronto para Coleta", "check-circle", Tone::Green),
        OrderStatus::HeadingToPickup if ride => label("Buscando Passageiro", "store", Tone::Orange),
        OrderStatus::HeadingToPickup => label("Indo para o Restaurante", "store", Tone::Orange),
        OrderStatus::Delivering if ride => label("Em Corrida", "car", Tone::Purple),
        OrderStatus::Delivering => label("Levando ao Cliente", "bike", Tone::Purple),
        other => store_label(other),
    }
}

/// Button text for an order action
pub fn action_label(action: OrderAction, service: ServiceKind) -> &'static str {
    let ride = service == ServiceKind::Ride;
    match action {
        OrderAction::Accept => "Aceitar & Preparar",
        OrderAction::MarkReady => "Marcar como Pronto",
        OrderAction::Claim if ride => "Aceitar Corrida",
        OrderAction::Claim => "Aceitar Entrega",
        OrderAction::ConfirmPickup if ride => "Passageiro Embarcou",
        OrderAction::ConfirmPickup => "Confirmar Coleta",
        OrderAction::Complete if ride => "Corrida Finalizada",
        OrderAction::Complete => "Finalizar Entrega",
        OrderAction::Cancel => "Cancelar Pedido",
    }
}
