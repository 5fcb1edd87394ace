use std::fmt::Write;

use relay_types::models::{OrderDetails, OrderNotification};

const HEADER: &str = "🛒 มีคำสั่งซื้อใหม่!";
const RULE: &str = "━━━━━━━━━━━━";

/// Render an order as the LINE text pushed to the shop owner.
///
/// Section order is fixed: header, order body, note, payment slip link.
/// The note and slip sections only appear when they carry content.
pub fn format_order(order: &OrderNotification) -> String {
    let mut out = String::with_capacity(256);
    let _ = writeln!(out, "{HEADER}");
    let _ = writeln!(out, "{RULE}");

    match order {
        OrderNotification::Reference { order_id } => {
            let _ = writeln!(out, "📄 Order ID: {order_id}");
            let _ = writeln!(out, "✅ สถานะ: ยืนยันการสั่งซื้อแล้ว");
            let _ = write!(out, "{RULE}");
        }
        OrderNotification::Details(details) => write_details(&mut out, details),
    }

    out
}

fn write_details(out: &mut String, d: &OrderDetails) {
    let _ = writeln!(out, "👤 ชื่อ: {}", d.name);
    let _ = writeln!(out, "📦 สินค้า: {}", d.product);
    let _ = writeln!(out, "🔢 จำนวน: {}", d.quantity);
    let _ = writeln!(out, "📞 เบอร์โทร: {}", d.phone);
    let _ = writeln!(out, "🏠 ที่อยู่: {}", d.address);
    let _ = write!(out, "{RULE}");

    if let Some(note) = non_blank(&d.note) {
        let _ = write!(out, "\n📝 หมายเหตุ: {note}\n{RULE}");
    }
    if let Some(url) = non_blank(&d.slip_url) {
        let _ = write!(out, "\n🧾 สลิปโอนเงิน: {url}");
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
