//! Output formatting for dumped records

use chat_core::Role;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Serialize `value` as JSON indented by a single space
pub fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// One line of the role listing
pub fn role_line(role: &Role) -> String {
    format!(
        "Role {}, ID: {}, Position: {}, Perms: {}, Hoist: {}, Color: {}, Managed: {}",
        role.name, role.id, role.position, role.permissions, role.hoist, role.color, role.managed
    )
}
