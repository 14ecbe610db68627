use serde::Serialize;

use crate::gateway::transport::Form;

#[derive(Debug)]
pub struct Masked;

pub trait MaskPolicy {
    fn mask(card: &str) -> String;
}

impl MaskPolicy for Masked {
    fn mask(card: &str) -> String {
        let len = card.chars().count();
        if len > 4 {
            let tail: String = card.chars().skip(len - 4).collect();
            "*".repeat(len - 4) + &tail
        } else {
            card.to_string()
        }
    }
}

/// Return true if a key name likely holds a PAN/card number.
fn is_pan_key(key: &str) -> bool {
    let k = key.to_lowercase();
    k == "pan"
        || k == "number"
        || k.contains("card") && (k.contains("number") || k.contains("num"))
        || k.contains("cardnumber")
}

/// Return true if a key name likely holds a CVV/CVC.
fn is_cvv_key(key: &str) -> bool {
    let k = key.to_lowercase();
    k.contains("cvv")
        || k.contains("cvc")
        || k.contains("card_verification")
        || k.contains("verification_value")
        || k.contains("secure_number")
}

/// Return true if a key name holds merchant secrets.
fn is_secret_key(key: &str) -> bool {
    let k = key.to_lowercase();
    k == "api_key" || k == "apikey"
}

pub fn secure_form(form: &Form) -> serde_json::Value {
    let map = form
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
        .collect::<serde_json::Map<_, _>>();
    secure_value(&serde_json::Value::Object(map))
}

pub fn secure_serializable(v: impl Serialize) -> serde_json::Value {
    match serde_json::to_value(v) {
        Ok(value) => secure_value(&value),
        Err(_) => serde_json::Value::Null,
    }
}

pub fn secure_value(v: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match v {
        Value::Object(map) => {
            let mut new = serde_json::Map::with_capacity(map.len());
            for (k, val) in map {
                let is_pan = is_pan_key(k);
                let is_hidden = is_cvv_key(k) || is_secret_key(k);
                let new_val = match val {
                    Value::String(s) if is_pan => Value::String(Masked::mask(s)),
                    Value::String(_) if is_hidden => Value::String("***".to_string()),
                    Value::Number(n) if is_pan => {
                        let s = n.to_string();
                        Value::String(Masked::mask(&s))
                    }
                    Value::Number(_) if is_hidden => Value::String("***".to_string()),
                    _ => secure_value(val),
                };
                new.insert(k.clone(), new_val);
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(secure_value).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn masks_swipe_form() {
        let form: Form = vec![
            ("card_number", "4000100011112224".into()),
            ("secure_number", "123".into()),
            ("api_key", "9795affd2fb06755".into()),
            ("merchant_id", "40A67A96A6CF4".into()),
            ("amount", "100".into()),
        ];
        let masked = secure_form(&form);
        assert_eq!(masked["card_number"], "************2224");
        assert_eq!(masked["secure_number"], "***");
        assert_eq!(masked["api_key"], "***");
        assert_eq!(masked["merchant_id"], "40A67A96A6CF4");
        assert_eq!(masked["amount"], "100");
    }

    #[test]
    fn masks_nested_values() {
        let value = json!({
            "params": { "card": { "number": 4000100011112224u64, "verification_value": "999" } },
            "list": [{ "pan": "5555" }]
        });
        let masked = secure_value(&value);
        assert_eq!(masked["params"]["card"]["number"], "************2224");
        assert_eq!(masked["params"]["card"]["verification_value"], "***");
        assert_eq!(masked["list"][0]["pan"], "5555");
    }
}
