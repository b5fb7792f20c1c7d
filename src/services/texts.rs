//! Testi dei messaggi inviati agli utenti
//!
//! Tutto il parlato del bot passa da qui: i servizi compongono i dati,
//! queste funzioni li trasformano in HTML per Telegram. Nei testi non
//! vanno mai usati `&`, `<` o `>` non escapati.

use chrono::{DateTime, Utc};

use crate::dtos::{AdminOverview, DownloadReport, UserStats};
use crate::entities::{Download, MediaKind, User};

pub fn welcome(first_name: &str, max_per_day: i32) -> String {
    format!(
        "🎉 Hi <b>{first_name}</b>! Welcome to the Instagram downloader bot!\n\n\
         🎬 Send me the link of an Instagram post to download its video or photo\n\
         📱 Every kind of Instagram post is supported\n\n\
         💡 You can download up to {max_per_day} files per day\n\
         ⚡ Fast downloads, full quality\n\n\
         🔸 Use the menu below:"
    )
}

pub fn help(max_per_day: i32, max_file_mb: u32) -> String {
    format!(
        "❓ <b>How to use the bot</b>\n\n\
         🔸 Copy the link of an Instagram post\n\
         🔸 Send the link to the bot\n\
         🔸 Wait for the bot to send you the file\n\n\
         📝 <b>Good to know:</b>\n\
         • The post must be public (not private)\n\
         • You can download up to {max_per_day} files per day\n\
         • Maximum file size is {max_file_mb} MB\n\
         • Both videos and photos are supported\n\
         • Reels, IGTV and regular posts all work\n\n\
         💡 <b>Examples of valid links:</b>\n\
         <code>https://www.instagram.com/p/ABC123/</code>\n\
         <code>https://www.instagram.com/reel/XYZ789/</code>\n\
         <code>https://www.instagram.com/tv/DEF456/</code>\n\n\
         ❓ Questions? Use the support button"
    )
}

pub fn support() -> String {
    "📞 <b>Support and contact</b>\n\n\
     🆔 Support handle: <code>coming soon</code>\n\
     📧 Email: <code>support@instagram-downloader.com</code>\n\
     🌐 Website: <code>coming soon</code>\n\n\
     ⏰ <b>Support hours:</b>\n\
     🕘 Monday to Friday: 9:00 to 24:00\n\
     🕘 Saturday: 14:00 to 22:00\n\n\
     🔸 Reach out for technical problems or questions\n\
     🔸 Share your suggestions with us\n\
     🔸 Use this channel to report bugs"
        .to_string()
}

pub fn about(version: &str, now: DateTime<Utc>) -> String {
    format!(
        "🎯 <b>About the Instagram downloader bot</b>\n\n\
         🤖 Name: Instagram Downloader Bot\n\
         📱 Version: {version}\n\
         👨‍💻 Author: the development team\n\
         📅 Build date: {}\n\n\
         ✨ <b>Features:</b>\n\
         • Download videos and photos from Instagram\n\
         • Reels, IGTV and regular posts\n\
         • Personal stats panel\n\
         • Full admin panel\n\
         • Daily limit system\n\
         • Several resolution methods for reliability\n\
         • High speed, full quality\n\n\
         💝 Thank you for using the bot\n\
         🌟 Share it with your friends",
        now.format("%Y-%m-%d")
    )
}

pub fn invalid_input() -> String {
    "❓ <b>I did not get that!</b>\n\n\
     🔸 Send an Instagram link\n\
     🔸 Or use the menu below\n\n\
     💡 <b>Example of a valid link:</b>\n\
     <code>https://www.instagram.com/p/ABC123/</code>"
        .to_string()
}

pub fn banned() -> String {
    "🚫 <b>Your account is blocked</b>\n\nContact support to lift the ban".to_string()
}

pub fn quota_exceeded(max_per_day: i32) -> String {
    format!(
        "⚠️ <b>Daily download limit</b>\n\n\
         You have reached your daily download limit\n\n\
         📊 Limit: {max_per_day} downloads per day\n\
         🕐 The limit resets at 00:00"
    )
}

pub fn processing() -> String {
    "⏳ <b>Processing...</b>\n\n\
     🔍 Fetching post info\n\
     📥 Preparing the download\n\n\
     Please wait..."
        .to_string()
}

pub fn resolution_failed() -> String {
    "❌ <b>Download failed!</b>\n\n\
     🔸 The link is invalid or wrong\n\
     🔸 The post is private\n\
     🔸 The post was deleted\n\
     🔸 Temporary problem on Instagram's side\n\n\
     💡 Please:\n\
     • Check the link again\n\
     • Make sure the post is public\n\
     • Try again in a few minutes"
        .to_string()
}

pub fn delivery_failed(max_file_mb: u32) -> String {
    format!(
        "❌ <b>Could not send the file!</b>\n\n\
         🔸 The file is too large (max {max_file_mb} MB)\n\
         🔸 Temporary problem on Telegram's side\n\
         🔸 Unsupported file type\n\n\
         💡 Please try again in a few minutes"
    )
}

pub fn delivery_caption(kind: MediaKind) -> String {
    let label = match kind {
        MediaKind::Video => "🎬 Instagram video",
        MediaKind::Photo => "📷 Instagram photo",
        MediaKind::Document => "📄 Instagram media",
    };
    format!("✅ <b>Download complete!</b>\n\n{label}\n📱 @InstagramDownloaderBot")
}

pub fn success_summary(stats: &UserStats) -> String {
    format!(
        "🎉 <b>File delivered successfully!</b>\n\n\
         📊 Your stats:\n\
         • Downloads today: <code>{}</code>\n\
         • Remaining today: <code>{}</code>\n\
         • Total downloads: <code>{}</code>\n\n\
         💡 Send another link to download more!",
        group_digits(stats.downloads_today),
        group_digits(stats.remaining_today),
        group_digits(stats.total_downloads)
    )
}

pub fn success_short() -> String {
    "🎉 <b>File delivered successfully!</b>\n\n💡 Send another link to download more!".to_string()
}

pub fn storage_error() -> String {
    "❌ <b>Temporary problem</b>\n\nPlease try again in a few moments".to_string()
}

pub fn user_stats(user: &User, stats: &UserStats) -> String {
    let mut text = format!(
        "📊 <b>Your stats</b>\n\n👤 Name: <b>{}</b>\n",
        user.first_name.as_deref().unwrap_or("Unknown")
    );
    if let Some(username) = &user.username {
        text.push_str(&format!("🆔 Username: @{username}\n"));
    }
    text.push_str(&format!(
        "\n📈 <b>Download stats:</b>\n\
         📊 Total downloads: <code>{}</code>\n\
         📅 Downloads today: <code>{}</code>\n\
         ⏳ Remaining today: <code>{}</code>\n\n\
         📅 Joined: <code>{}</code>\n\
         🕐 Last activity: <code>{}</code>\n\n",
        group_digits(stats.total_downloads),
        group_digits(stats.downloads_today),
        group_digits(stats.remaining_today),
        stats.join_date.format("%Y-%m-%d %H:%M"),
        stats.last_activity.format("%Y-%m-%d %H:%M")
    ));

    if stats.is_banned {
        text.push_str("🚫 <b>Your account is blocked</b>\nContact support to lift the ban");
    } else {
        text.push_str("✅ Account status: <b>active</b>");
    }

    text
}

pub fn recent_empty() -> String {
    "📭 You have not downloaded anything yet\n\n\
     Send me an Instagram link and I will fetch it for you! 😊"
        .to_string()
}

pub fn recent_downloads(downloads: &[Download]) -> String {
    let mut text = "🔄 <b>Your recent downloads</b>\n\n".to_string();

    for (index, download) in downloads.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} {}\n   📅 {}\n   🔗 {}\n\n",
            index + 1,
            download.file_type.emoji(),
            download.file_type.as_str(),
            download.download_date.format("%Y-%m-%d %H:%M"),
            shorten(&download.url, 40)
        ));
    }

    text.push_str("💡 Send a new link for a new download");
    text
}

pub fn admin_overview(overview: &AdminOverview) -> String {
    format!(
        "🔧 <b>Bot admin panel</b>\n\n\
         👥 Total users: <code>{}</code>\n\
         🟢 Active today: <code>{}</code>\n\
         📊 Active this week: <code>{}</code>\n\
         🆕 New users today: <code>{}</code>\n\n\
         📥 Total downloads: <code>{}</code>\n\
         📅 Downloads today: <code>{}</code>\n\
         📈 Downloads this week: <code>{}</code>\n\n\
         💾 Memory: <code>{:.2} MB</code>\n\
         ⏰ Server time: <code>{}</code>\n\n\
         Use the menu below to manage the bot:",
        group_digits(overview.total_users),
        group_digits(overview.active_today),
        group_digits(overview.active_week),
        group_digits(overview.new_users_today),
        group_digits(overview.total_downloads),
        group_digits(overview.downloads_today),
        group_digits(overview.downloads_week),
        overview.memory_mb,
        overview.server_time.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn admin_detailed(overview: &AdminOverview, version: &str) -> String {
    let mut text = format!(
        "📊 <b>Detailed system stats</b>\n\n\
         👥 <b>Users:</b>\n\
         • Total users: <code>{}</code>\n\
         • Active today: <code>{}</code>\n\
         • Active this week: <code>{}</code>\n\
         • New users today: <code>{}</code>\n",
        group_digits(overview.total_users),
        group_digits(overview.active_today),
        group_digits(overview.active_week),
        group_digits(overview.new_users_today)
    );

    if overview.total_users > 0 {
        let active_percent = overview.active_today as f64 / overview.total_users as f64 * 100.0;
        text.push_str(&format!("• Activity rate: <code>{active_percent:.2}%</code>\n"));
    }

    text.push_str(&format!(
        "\n📈 <b>Downloads:</b>\n\
         • Total downloads: <code>{}</code>\n\
         • Downloads today: <code>{}</code>\n\
         • Downloads this week: <code>{}</code>\n",
        group_digits(overview.total_downloads),
        group_digits(overview.downloads_today),
        group_digits(overview.downloads_week)
    ));

    if overview.total_users > 0 {
        let average = overview.total_downloads as f64 / overview.total_users as f64;
        text.push_str(&format!(
            "• Average downloads: <code>{average:.2}</code> files/user\n"
        ));
    }

    text.push_str(&format!(
        "\n🖥️ <b>System:</b>\n\
         • Memory in use: <code>{:.2} MB</code>\n\
         • Version: <code>{version}</code>\n\
         • Server time: <code>{}</code>",
        overview.memory_mb,
        overview.server_time.format("%Y-%m-%d %H:%M:%S")
    ));

    text
}

pub fn top_users(users: &[User], banned_count: i64) -> String {
    let mut text = "👥 <b>Top users (top 15)</b>\n\n".to_string();

    if users.is_empty() {
        text.push_str("📭 No users found");
        return text;
    }

    for (index, user) in users.iter().enumerate() {
        let status = if user.is_banned { "🚫" } else { "✅" };
        let username = user
            .username
            .as_ref()
            .map(|u| format!("@{u}"))
            .unwrap_or_else(|| "no username".to_string());

        text.push_str(&format!(
            "{}. {} <b>{}</b>\n   🆔 ID: <code>{}</code>\n   📱 {}\n   📊 Total: {} | Today: {}\n   📅 Joined: {}\n   🕐 Last seen: {}\n\n",
            index + 1,
            status,
            user.first_name.as_deref().unwrap_or("Unknown"),
            user.id,
            username,
            group_digits(user.total_downloads),
            user.downloads_today,
            user.join_date.format("%Y-%m-%d"),
            user.last_activity.format("%m-%d %H:%M")
        ));
    }

    let listed_active = users.iter().filter(|u| !u.is_banned).count();
    text.push_str(&format!(
        "📊 <b>Summary:</b>\n\
         🚫 Banned users: <code>{}</code>\n\
         ✅ Active among listed: <code>{listed_active}</code>",
        group_digits(banned_count)
    ));

    text
}

pub fn download_report(report: &DownloadReport) -> String {
    let mut text = "📈 <b>Detailed download report</b>\n\n".to_string();

    text.push_str("📅 <b>Downloads in the last 7 days:</b>\n");
    if report.daily.is_empty() {
        text.push_str("📭 No data found\n");
    } else {
        for day in &report.daily {
            text.push_str(&format!(
                "• {} ({}): <code>{}</code> downloads\n",
                day.day.format("%A"),
                day.day.format("%Y-%m-%d"),
                group_digits(day.count)
            ));
        }
    }

    text.push_str("\n📁 <b>File type distribution:</b>\n");
    for kind in &report.by_kind {
        text.push_str(&format!(
            "• {} {}: <code>{}</code>\n",
            kind.file_type.emoji(),
            capitalize(kind.file_type.as_str()),
            group_digits(kind.count)
        ));
    }

    text.push_str("\n🕐 <b>Peak hours:</b>\n");
    for hour in &report.peak_hours {
        text.push_str(&format!(
            "• {:02}:00: <code>{}</code> downloads\n",
            hour.hour,
            group_digits(hour.count)
        ));
    }

    text
}

/// Separatore delle migliaia, stile `number_format`.
fn group_digits(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Tronca a `max` caratteri e aggiunge sempre i puntini di sospensione.
fn shorten(url: &str, max: usize) -> String {
    let head: String = url.chars().take(max).collect();
    format!("{head}...")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
