//! Shared fixtures for integration tests: the class most tests double, and a
//! small publish/subscribe hub driven through doubles.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use doppelganger::{bind_behavior, Class, DoubleError, DoubleResult, ObjectId, ObjectRef, Value};
use thiserror::Error;

static TRACING: Once = Once::new();

/// Routes library traces to the test writer; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// One data member and one method.
pub fn true_class() -> Arc<Class> {
    Class::builder("TrueClass")
        .member("member", 0)
        .method("method", |_, _| Ok(Value::from("lol")))
        .build()
}

#[derive(Debug, Error)]
pub enum HubError {
    #[error("broadcaster {0} is not registered")]
    BroadcasterNotRegistered(ObjectId),

    #[error("receiver {0} is not registered")]
    ReceiverNotRegistered(ObjectId),
}

/// Fans messages from registered broadcasters out to registered receivers.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    broadcasters: Mutex<Vec<ObjectRef>>,
    receivers: Mutex<Vec<ObjectRef>>,
}

impl BroadcastHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns false if `broadcaster` was already registered.
    pub fn register_broadcaster(&self, broadcaster: &ObjectRef) -> bool {
        register(&self.broadcasters, broadcaster)
    }

    pub fn deregister_broadcaster(&self, broadcaster: &ObjectRef) -> Result<(), HubError> {
        if deregister(&self.broadcasters, broadcaster) {
            Ok(())
        } else {
            Err(HubError::BroadcasterNotRegistered(broadcaster.id()))
        }
    }

    /// Returns false if `receiver` was already registered.
    pub fn register_receiver(&self, receiver: &ObjectRef) -> bool {
        register(&self.receivers, receiver)
    }

    pub fn deregister_receiver(&self, receiver: &ObjectRef) -> Result<(), HubError> {
        if deregister(&self.receivers, receiver) {
            Ok(())
        } else {
            Err(HubError::ReceiverNotRegistered(receiver.id()))
        }
    }

    /// Calls `receive(message)` on every receiver if `broadcaster` is
    /// registered. Returns the number of receivers reached.
    pub fn broadcast(&self, broadcaster: &ObjectRef, message: &Value) -> DoubleResult<usize> {
        let registered = self.broadcasters.lock().unwrap().contains(broadcaster);
        if !registered {
            return Ok(0);
        }

        let receivers = self.receivers.lock().unwrap().clone();
        for receiver in &receivers {
            receiver.call("receive", std::slice::from_ref(message))?;
        }
        Ok(receivers.len())
    }

    pub fn broadcaster_count(&self) -> usize {
        self.broadcasters.lock().unwrap().len()
    }

    pub fn receiver_count(&self) -> usize {
        self.receivers.lock().unwrap().len()
    }
}

fn register(parties: &Mutex<Vec<ObjectRef>>, party: &ObjectRef) -> bool {
    let mut parties = parties.lock().unwrap();
    if parties.contains(party) {
        return false;
    }
    parties.push(party.clone());
    true
}

fn deregister(parties: &Mutex<Vec<ObjectRef>>, party: &ObjectRef) -> bool {
    let mut parties = parties.lock().unwrap();
    match parties.iter().position(|p| p == party) {
        Some(index) => {
            parties.remove(index);
            true
        }
        None => false,
    }
}

fn no_op(_: &ObjectRef, _: &[Value]) -> DoubleResult<Value> {
    Ok(Value::Null)
}

fn clear_manager(this: &ObjectRef, _: &[Value]) -> DoubleResult<Value> {
    this.set("broadcast_manager", Value::Null)?;
    Ok(Value::Null)
}

pub fn broadcaster_class() -> Arc<Class> {
    Class::builder("Broadcaster")
        .initializer(clear_manager)
        .method("register", no_op)
        .method("deregister", no_op)
        .method("broadcast", no_op)
        .build()
}

pub fn receiver_class() -> Arc<Class> {
    Class::builder("Receiver")
        .initializer(clear_manager)
        .method("register", no_op)
        .method("deregister", no_op)
        .method("receive", no_op)
        .build()
}

/// Patches `register` to register `broadcaster` with `hub`.
pub fn patch_broadcaster_register(broadcaster: &ObjectRef, hub: &Arc<BroadcastHub>) {
    let hub = Arc::clone(hub);
    bind_behavior(broadcaster, "register", move |this, _| {
        hub.register_broadcaster(this);
        this.set("broadcast_manager", true)?;
        Ok(Value::Null)
    })
    .unwrap();
}

/// Patches `broadcast` to publish through `hub`.
pub fn patch_broadcaster_broadcast(broadcaster: &ObjectRef, hub: &Arc<BroadcastHub>) {
    let hub = Arc::clone(hub);
    bind_behavior(broadcaster, "broadcast", move |this, args| {
        let message = args.first().cloned().unwrap_or_default();
        let reached = hub.broadcast(this, &message)?;
        Ok(Value::Int(i64::try_from(reached).map_err(|e| DoubleError::internal(e.to_string()))?))
    })
    .unwrap();
}

/// Patches `register` to register `receiver` with `hub`.
pub fn patch_receiver_register(receiver: &ObjectRef, hub: &Arc<BroadcastHub>) {
    let hub = Arc::clone(hub);
    bind_behavior(receiver, "register", move |this, _| {
        hub.register_receiver(this);
        this.set("broadcast_manager", true)?;
        Ok(Value::Null)
    })
    .unwrap();
}

/// Patches `receive` to record every message; returns the record.
pub fn patch_receiver_receive(receiver: &ObjectRef) -> Arc<Mutex<Vec<Value>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bind_behavior(receiver, "receive", move |_, args| {
        sink.lock().unwrap().push(args.first().cloned().unwrap_or_default());
        Ok(Value::Null)
    })
    .unwrap();
    seen
}
