mod common;

use common::{init_tracing, true_class};
use doppelganger::reflect::{attribute_dictionary, list_attribute_names};
use doppelganger::{
    bind_constant_return, bind_delegate, Callable, Class, DoubleClass, DoubleConfig, Nullification,
    ObjectRef, Value,
};

fn make_mock_object_with_untouchable(names: &[&str]) -> ObjectRef {
    let double = DoubleClass::mock(&true_class());
    for name in names {
        double.declare_untouchable(name).unwrap();
    }
    double.instantiate(&[]).unwrap()
}

#[test]
fn mock_object_attribute_names_cover_real_ones() {
    init_tracing();
    let real = list_attribute_names(&Class::instantiate(&true_class(), &[]).unwrap()).unwrap();
    let mock = list_attribute_names(&make_mock_object_with_untouchable(&[])).unwrap();
    assert!(real.is_subset(&mock));
}

#[test]
fn mock_object_member_is_a_no_op_method() {
    let mock = make_mock_object_with_untouchable(&[]);
    assert!(mock.get("member").unwrap().is_callable());
    assert!(mock.call("member", &[]).unwrap().is_null());
}

#[test]
fn mock_object_method_accepts_any_arguments() {
    let mock = make_mock_object_with_untouchable(&[]);
    assert!(mock.call("method", &[]).unwrap().is_null());
    assert!(mock
        .call("method", &[Value::Int(1), Value::from("two"), Value::List(vec![])])
        .unwrap()
        .is_null());
}

#[test]
fn every_nullified_attribute_returns_null_when_called() {
    let mock = make_mock_object_with_untouchable(&[]);
    for (name, value) in attribute_dictionary(&mock).unwrap() {
        if name.starts_with("__") {
            continue;
        }
        assert!(value.call(&[Value::Bool(true)]).unwrap().is_null(), "{name} is not a no-op");
    }
}

#[test]
fn mock_object_invalid_descriptor() {
    let mock = make_mock_object_with_untouchable(&[]);
    assert!(mock.get("invalid_descriptor").unwrap_err().is_no_such_attribute());
}

#[test]
fn mock_object_with_untouched_member() {
    let mock = make_mock_object_with_untouchable(&["member"]);
    assert_eq!(mock.get("member").unwrap(), Value::Int(0));
    assert!(mock.call("method", &[]).unwrap().is_null());
}

#[test]
fn mock_object_with_untouched_method() {
    let mock = make_mock_object_with_untouchable(&["method"]);
    assert_eq!(mock.call("method", &[]).unwrap(), Value::from("lol"));
    assert!(mock.call("member", &[]).unwrap().is_null());
}

#[test]
fn mock_object_with_untouched_member_and_method() {
    let mock = make_mock_object_with_untouchable(&["member", "method"]);
    assert_eq!(mock.get("member").unwrap(), Value::Int(0));
    assert_eq!(mock.call("method", &[]).unwrap(), Value::from("lol"));
}

#[test]
fn mock_policy_survives_instantiation() {
    let double = DoubleClass::mock(&true_class());
    let _ = double.instantiate(&[]).unwrap();

    double.declare_untouchable("method").unwrap();
    let mock = double.instantiate(&[]).unwrap();
    assert_eq!(mock.call("method", &[]).unwrap(), Value::from("lol"));
}

#[test]
fn mock_configured_from_json() {
    let config = DoubleConfig::from_json(
        r#"{"strategy": "no_op_callable", "untouchable": ["method"], "touchable": []}"#,
    )
    .unwrap();
    assert_eq!(config.strategy, Nullification::NoOpCallable);

    let double = DoubleClass::from_config(&true_class(), &config).unwrap();
    let mock = double.instantiate(&[]).unwrap();
    assert_eq!(mock.call("method", &[]).unwrap(), Value::from("lol"));
    assert!(mock.call("member", &[]).unwrap().is_null());
    assert!(double.policy().unwrap().untouchable.contains(&"method".to_string()));
}

#[test]
fn patch_mock_constant_return() {
    let mock = make_mock_object_with_untouchable(&[]);
    bind_constant_return(&mock, "method", 42).unwrap();
    assert_eq!(mock.call("method", &[]).unwrap(), Value::Int(42));
    assert_eq!(mock.call("method", &[Value::Int(7), Value::Null]).unwrap(), Value::Int(42));
}

#[test]
fn patch_mock_delegate() {
    let add = Callable::new("add", |args| match args {
        [Value::Int(x), Value::Int(y)] => Ok(Value::Int(x + y)),
        _ => Ok(Value::Null),
    });

    let mock = make_mock_object_with_untouchable(&[]);
    bind_delegate(&mock, "method", add, [Value::Int(10)]).unwrap();
    assert_eq!(mock.call("method", &[Value::Int(20)]).unwrap(), Value::Int(30));
}
