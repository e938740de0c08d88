#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::oneshot;

use techmart_storefront::{
    client::{RemoteStore, Session, StoreError},
    models::{Cart, CartLine, Category, Item, Order, OrderReceipt},
};

pub const PASSWORD: &str = "secret";

pub fn item(id: i32, name: &str, price: i64, category: Category, rating: f64) -> Item {
    Item {
        id,
        name: name.to_string(),
        description: format!("{name} description"),
        price,
        category,
        rating,
        reviews: 10 * id,
        in_stock: true,
        image: format!("https://img.example/{id}.jpg"),
    }
}

pub fn catalog() -> Vec<Item> {
    vec![
        item(1, "Widget", 10, Category::Electronics, 4.5),
        item(2, "Gadget", 5, Category::Furniture, 4.9),
        item(3, "Coffee", 7, Category::FoodAndBeverages, 3.8),
    ]
}

#[derive(Default)]
struct ServerState {
    items: Vec<Item>,
    cart: Option<Cart>,
    orders: Vec<Order>,
    next_line_id: i32,
}

/// In-memory stand-in for the TechMart API with failure injection and held responses.
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<ServerState>,
    cart_failures: Mutex<VecDeque<StoreError>>,
    add_failures: Mutex<VecDeque<StoreError>>,
    remove_failures: Mutex<VecDeque<StoreError>>,
    cart_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    add_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    add_reply_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    pub get_cart_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().items = catalog();
        store
    }

    pub fn session() -> Session {
        Session::Authenticated {
            username: "shopper".into(),
            token: "token-shopper".into(),
        }
    }

    /// Mutate the server-side cart directly, as another tab would.
    pub fn put_line(&self, item_id: i32, quantity: i32) {
        let mut state = self.state.lock().unwrap();
        apply_add(&mut state, item_id, quantity);
    }

    pub fn server_cart(&self) -> Option<Cart> {
        self.state.lock().unwrap().cart.clone()
    }

    pub fn fail_next_get_cart(&self, err: StoreError) {
        self.cart_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_next_add(&self, err: StoreError) {
        self.add_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_next_remove(&self, err: StoreError) {
        self.remove_failures.lock().unwrap().push_back(err);
    }

    /// The next `get_cart` reads the server state, then waits for the returned sender.
    pub fn hold_next_get_cart(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.cart_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// The next `add_to_cart` waits for the returned sender before touching the cart.
    pub fn hold_next_add(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.add_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// The next `add_to_cart` updates the cart, then waits for the returned sender to reply.
    pub fn hold_next_add_reply(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.add_reply_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn get_cart_calls(&self) -> usize {
        self.get_cart_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }
}

fn check_session(session: &Session) -> Result<(), StoreError> {
    session.token().map(|_| ())
}

fn apply_add(state: &mut ServerState, item_id: i32, quantity: i32) {
    let item = state
        .items
        .iter()
        .find(|i| i.id == item_id)
        .cloned()
        .expect("known item");
    state.next_line_id += 1;
    let line_id = state.next_line_id;
    let cart = state.cart.get_or_insert_with(|| Cart {
        id: 1,
        user_id: 7,
        items: Vec::new(),
    });
    match cart.items.iter_mut().find(|l| l.item_id == item_id) {
        Some(line) => line.quantity += quantity,
        None => cart.items.push(CartLine {
            id: line_id,
            cart_id: cart.id,
            item_id,
            price: item.price,
            item,
            quantity,
        }),
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn login(&self, username: &str, password: &str) -> Result<String, StoreError> {
        if password != PASSWORD {
            return Err(StoreError::Validation("Invalid username or password".into()));
        }
        Ok(format!("token-{username}"))
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.state.lock().unwrap().items.clone())
    }

    async fn get_cart(&self, session: &Session) -> Result<Cart, StoreError> {
        self.get_cart_calls.fetch_add(1, Ordering::SeqCst);
        check_session(session)?;
        let failure = self.cart_failures.lock().unwrap().pop_front();
        let snapshot = self.state.lock().unwrap().cart.clone();
        let gate = self.cart_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(err) = failure {
            return Err(err);
        }
        snapshot.ok_or_else(|| StoreError::NotFound("Cart not found".into()))
    }

    async fn add_to_cart(
        &self,
        session: &Session,
        item_id: i32,
        quantity: i32,
    ) -> Result<(), StoreError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        check_session(session)?;
        let gate = self.add_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(err) = self.add_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        apply_add(&mut self.state.lock().unwrap(), item_id, quantity);
        let reply_gate = self.add_reply_gates.lock().unwrap().pop_front();
        if let Some(gate) = reply_gate {
            let _ = gate.await;
        }
        Ok(())
    }

    async fn remove_from_cart(&self, session: &Session, item_id: i32) -> Result<(), StoreError> {
        check_session(session)?;
        if let Some(err) = self.remove_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        let mut state = self.state.lock().unwrap();
        let cart = state
            .cart
            .as_mut()
            .ok_or_else(|| StoreError::NotFound("Cart item not found".into()))?;
        let before = cart.items.len();
        cart.items.retain(|l| l.item_id != item_id);
        if cart.items.len() == before {
            return Err(StoreError::NotFound("Cart item not found".into()));
        }
        Ok(())
    }

    async fn create_order(&self, session: &Session) -> Result<OrderReceipt, StoreError> {
        check_session(session)?;
        let mut state = self.state.lock().unwrap();
        let cart = match state.cart.as_mut() {
            Some(cart) if !cart.items.is_empty() => cart,
            _ => return Err(StoreError::Validation("Cart is empty".into())),
        };
        let snapshot = cart.clone();
        cart.items.clear();
        let total = snapshot.total();
        let order_id = 100 + i32::try_from(state.orders.len()).expect("order count fits i32");
        state.orders.push(Order {
            id: order_id,
            user_id: snapshot.user_id,
            cart_id: snapshot.id,
            total,
            status: "placed".into(),
            created_at: Utc::now(),
            cart: snapshot,
        });
        Ok(OrderReceipt { order_id, total })
    }

    async fn list_orders(&self, session: &Session) -> Result<Vec<Order>, StoreError> {
        check_session(session)?;
        let mut orders = self.state.lock().unwrap().orders.clone();
        orders.reverse();
        Ok(orders)
    }
}
