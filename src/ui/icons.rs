//! Shared UI icons.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

// Wizard steps
pub static DOCUMENT: Emoji<'_, '_> = Emoji("📄 ", "");
pub static CALENDAR: Emoji<'_, '_> = Emoji("📅 ", "");
pub static CLIPBOARD: Emoji<'_, '_> = Emoji("📋 ", "");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">>");

// Buckets
pub static PERSON: Emoji<'_, '_> = Emoji("👤 ", "@");
pub static INBOX: Emoji<'_, '_> = Emoji("📥 ", "?");
