//! In-memory backend for unit tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{
    AcceptOrderRequest, Location, MenuDraft, MenuEntry, NewRestaurant, Order, OrderStatus,
    Restaurant,
};

use crate::error::{DeskError, DeskResult};
use crate::gateway::{Gateways, MenuGateway, OrderGateway, RestaurantGateway};

/// Gateway call, in the order it was made
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchOrders(String),
    SetStatus(String, OrderStatus),
    GetRestaurant(String),
    CreateRestaurant(NewRestaurant),
    GetLocation(String),
    AcceptOrder(AcceptOrderRequest),
    FindRestaurants(String),
    UpdateOpen(String, bool),
    UpdateVerification(String, bool),
    GetMenu(String),
    ListMenus(String),
    UpdateMenu(String, bool),
    CreateMenu(MenuDraft),
    EditMenu(String, MenuDraft),
    DeleteMenu(String),
}

/// Operation that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FetchOrders,
    SetStatus,
    GetLocation,
    AcceptOrder,
    FindRestaurants,
    CreateRestaurant,
    GetMenu,
    WriteMenu,
}

#[derive(Default)]
struct State {
    orders: Vec<Order>,
    restaurants: Vec<Restaurant>,
    menus: HashMap<String, MenuEntry>,
    failing: HashSet<Op>,
    fetch_delays: VecDeque<Duration>,
    next_id: u32,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<State>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        self.state.lock().orders = orders;
        self
    }

    pub fn with_restaurant(self, restaurant: Restaurant) -> Self {
        self.state.lock().restaurants.push(restaurant);
        self
    }

    pub fn with_menu(self, entry: MenuEntry) -> Self {
        self.state
            .lock()
            .menus
            .insert(entry.menu_id.clone(), entry);
        self
    }

    pub fn fail(&self, op: Op) {
        self.state.lock().failing.insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.state.lock().failing.remove(&op);
    }

    /// Delay the next order fetch. The response is the state at call time.
    pub fn delay_next_fetch(&self, delay: Duration) {
        self.state.lock().fetch_delays.push_back(delay);
    }

    /// Change an order on the server side only
    pub fn set_server_status(&self, order_id: &str, status: OrderStatus) {
        if let Some(order) = self
            .state
            .lock()
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
        {
            order.status = status;
        }
    }

    pub fn server_order(&self, order_id: &str) -> Option<Order> {
        self.state
            .lock()
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn gateways(&self) -> Gateways {
        Gateways::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    fn record(&self, call: Call, op: Option<Op>) -> DeskResult<()> {
        self.calls.lock().push(call);
        match op {
            Some(op) if self.state.lock().failing.contains(&op) => {
                Err(DeskError::Network("mock failure".into()))
            }
            _ => Ok(()),
        }
    }

    fn restaurant(&self, restaurant_id: &str) -> DeskResult<Restaurant> {
        self.state
            .lock()
            .restaurants
            .iter()
            .find(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .ok_or_else(|| DeskError::NotFound(format!("restaurant {restaurant_id}")))
    }

    pub fn menu(&self, menu_id: &str) -> Option<MenuEntry> {
        self.state.lock().menus.get(menu_id).cloned()
    }
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-new-{}", self.next_id)
    }
}

pub fn restaurant(id: &str, owner: &str, location: Option<Location>) -> Restaurant {
    Restaurant {
        restaurant_id: id.to_string(),
        user_id: owner.to_string(),
        name: format!("Restaurant {id}"),
        email: None,
        phone: None,
        address: None,
        cuisine: None,
        location,
        is_open: false,
        is_verified: false,
        rating_count: 0,
    }
}

#[async_trait]
impl OrderGateway for MockBackend {
    async fn fetch_orders_by_restaurant(&self, restaurant_id: &str) -> DeskResult<Vec<Order>> {
        self.record(Call::FetchOrders(restaurant_id.into()), Some(Op::FetchOrders))?;
        let (orders, delay) = {
            let mut state = self.state.lock();
            let orders: Vec<Order> = state
                .orders
                .iter()
                .filter(|o| o.restaurant_id == restaurant_id)
                .cloned()
                .collect();
            (orders, state.fetch_delays.pop_front())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(orders)
    }

    async fn set_order_status(&self, order_id: &str, status: &OrderStatus) -> DeskResult<Order> {
        self.record(Call::SetStatus(order_id.into(), status.clone()), Some(Op::SetStatus))?;
        let mut state = self.state.lock();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| DeskError::NotFound(format!("order {order_id}")))?;
        order.status = status.clone();
        Ok(order.clone())
    }
}

#[async_trait]
impl RestaurantGateway for MockBackend {
    async fn accept_order(&self, request: &AcceptOrderRequest) -> DeskResult<()> {
        self.record(Call::AcceptOrder(request.clone()), Some(Op::AcceptOrder))
    }

    async fn get_restaurant(&self, restaurant_id: &str) -> DeskResult<Restaurant> {
        self.record(Call::GetRestaurant(restaurant_id.into()), None)?;
        self.restaurant(restaurant_id)
    }

    async fn get_restaurant_location(&self, restaurant_id: &str) -> DeskResult<Location> {
        self.record(Call::GetLocation(restaurant_id.into()), Some(Op::GetLocation))?;
        self.restaurant(restaurant_id)?
            .location
            .ok_or_else(|| DeskError::InvalidResponse("no location".into()))
    }

    async fn create_restaurant(&self, new: &NewRestaurant) -> DeskResult<Restaurant> {
        self.record(Call::CreateRestaurant(new.clone()), Some(Op::CreateRestaurant))?;
        let mut state = self.state.lock();
        let mut created = restaurant(&state.next_id("r"), &new.user_id, Some(new.location));
        created.name = new.name.clone();
        created.address = Some(new.address.clone());
        created.phone = Some(new.phone.clone());
        created.cuisine = Some(new.cuisine_type.clone());
        state.restaurants.push(created.clone());
        Ok(created)
    }

    async fn find_restaurants_by_user(&self, user_id: &str) -> DeskResult<Vec<Restaurant>> {
        self.record(Call::FindRestaurants(user_id.into()), Some(Op::FindRestaurants))?;
        Ok(self
            .state
            .lock()
            .restaurants
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_open_status(&self, restaurant_id: &str, is_open: bool) -> DeskResult<()> {
        self.record(Call::UpdateOpen(restaurant_id.into(), is_open), None)?;
        let mut state = self.state.lock();
        let restaurant = state
            .restaurants
            .iter_mut()
            .find(|r| r.restaurant_id == restaurant_id)
            .ok_or_else(|| DeskError::NotFound(format!("restaurant {restaurant_id}")))?;
        restaurant.is_open = is_open;
        Ok(())
    }

    async fn update_verification_status(
        &self,
        restaurant_id: &str,
        is_verified: bool,
    ) -> DeskResult<()> {
        self.record(Call::UpdateVerification(restaurant_id.into(), is_verified), None)?;
        let mut state = self.state.lock();
        let restaurant = state
            .restaurants
            .iter_mut()
            .find(|r| r.restaurant_id == restaurant_id)
            .ok_or_else(|| DeskError::NotFound(format!("restaurant {restaurant_id}")))?;
        restaurant.is_verified = is_verified;
        Ok(())
    }
}

#[async_trait]
impl MenuGateway for MockBackend {
    async fn get_menu_entry(&self, menu_id: &str) -> DeskResult<MenuEntry> {
        self.record(Call::GetMenu(menu_id.into()), Some(Op::GetMenu))?;
        self.state
            .lock()
            .menus
            .get(menu_id)
            .cloned()
            .ok_or_else(|| DeskError::NotFound(format!("menu {menu_id}")))
    }

    async fn list_menus_by_restaurant(&self, restaurant_id: &str) -> DeskResult<Vec<MenuEntry>> {
        self.record(Call::ListMenus(restaurant_id.into()), None)?;
        Ok(self
            .state
            .lock()
            .menus
            .values()
            .filter(|m| m.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn update_menu_availability(
        &self,
        menu_id: &str,
        available: bool,
    ) -> DeskResult<MenuEntry> {
        self.record(Call::UpdateMenu(menu_id.into(), available), None)?;
        let mut state = self.state.lock();
        let entry = state
            .menus
            .get_mut(menu_id)
            .ok_or_else(|| DeskError::NotFound(format!("menu {menu_id}")))?;
        entry.available = available;
        Ok(entry.clone())
    }

    async fn create_menu_entry(&self, draft: &MenuDraft) -> DeskResult<MenuEntry> {
        self.record(Call::CreateMenu(draft.clone()), Some(Op::WriteMenu))?;
        let mut state = self.state.lock();
        let id = state.next_id("m");
        let entry = apply_draft(MenuEntry::new(id.clone(), "", 0.0), draft);
        state.menus.insert(id, entry.clone());
        Ok(entry)
    }

    async fn update_menu_entry(&self, menu_id: &str, draft: &MenuDraft) -> DeskResult<MenuEntry> {
        self.record(Call::EditMenu(menu_id.into(), draft.clone()), Some(Op::WriteMenu))?;
        let mut state = self.state.lock();
        let entry = state
            .menus
            .get_mut(menu_id)
            .ok_or_else(|| DeskError::NotFound(format!("menu {menu_id}")))?;
        *entry = apply_draft(entry.clone(), draft);
        Ok(entry.clone())
    }

    async fn delete_menu_entry(&self, menu_id: &str) -> DeskResult<()> {
        self.record(Call::DeleteMenu(menu_id.into()), Some(Op::WriteMenu))?;
        self.state
            .lock()
            .menus
            .remove(menu_id)
            .map(|_| ())
            .ok_or_else(|| DeskError::NotFound(format!("menu {menu_id}")))
    }
}

fn apply_draft(mut entry: MenuEntry, draft: &MenuDraft) -> MenuEntry {
    entry.name = draft.name.clone();
    entry.price = draft.price;
    entry.available = draft.available;
    if !draft.restaurant_id.is_empty() {
        entry.restaurant_id = draft.restaurant_id.clone();
    }
    entry.description = draft.description.clone();
    entry.image_url = draft.image_url.clone();
    entry
}
