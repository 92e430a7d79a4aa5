use teloxide::{
  prelude::*,
  utils::{command::BotCommands, html},
};

use super::ReplyBot;
use crate::{
  entity::{Account, HistoryEvent, Operator},
  prelude::*,
  state::{AppState, Services},
  sv::TrackedProfile,
  upstream::OperatorMap,
};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
  Help,
  /// Bind your chat account to a game account
  Link(String),
  /// Show a profile banner
  Profile(String),
  /// Refetch a profile, ignoring every cache
  Check(String),
  /// Drop cached banners of an account
  #[command(hide)]
  Clear(String),
}

const HELP: &str = "\
<b>📋 Commands</b>

/link &lt;account&gt; - Link your game account
/profile [account] - Show profile banner
/check [account] - Refresh profile right now
/help - Show this message";

const ADMIN_HELP: &str = "
/clear [account] - Drop cached banners";

// error texts are escaped on the way out
const NOT_LINKED: &str =
  "No account linked. Use /link <account> or pass one explicitly.";

pub async fn handle(
  app: Arc<AppState>,
  bot: ReplyBot,
  cmd: Command,
) -> ResponseResult<()> {
  let sv = app.sv();

  let result = match cmd {
    Command::Help if app.is_admin(bot.user_id) => {
      bot.reply_html(format!("{HELP}\n{ADMIN_HELP}")).await?;
      return Ok(());
    }
    Command::Help => {
      bot.reply_html(HELP).await?;
      return Ok(());
    }
    Command::Link(name) => link(&sv, &bot, &name).await,
    Command::Profile(name) => show(&sv, &bot, &name, false).await,
    Command::Check(name) => show(&sv, &bot, &name, true).await,
    Command::Clear(name) if app.is_admin(bot.user_id) => {
      clear(&sv, &bot, &name).await
    }
    Command::Clear(_) => {
      debug!("Ignoring /clear from non-admin {}", bot.user_id);
      return Ok(());
    }
  };

  match result {
    Ok(Reply::Text(text)) => {
      bot.reply_html(text).await?;
    }
    Ok(Reply::Banner { png, caption }) => {
      bot.reply_banner(png, caption).await?;
    }
    Err(err) => {
      warn!("Command from {} failed: {err}", bot.user_id);
      let text = html::escape(&err.to_string());
      bot.reply_html(format!("❌ {text}")).await?;
    }
  }

  Ok(())
}

enum Reply {
  Text(String),
  Banner { png: Vec<u8>, caption: String },
}

/// Account named in the command, or the one linked to the sender.
async fn resolve(
  sv: &Services<'_>,
  bot: &ReplyBot,
  name: &str,
) -> Result<Account> {
  if !name.trim().is_empty() {
    return Account::new(name);
  }
  sv.link
    .linked(bot.user_id)
    .await?
    .ok_or_else(|| Error::InvalidArgs(NOT_LINKED.into()))
}

async fn banner(
  sv: &Services<'_>,
  account: &Account,
  force: bool,
) -> Result<Reply> {
  let tracked = sv.tracker.update(account, force).await?;
  let png = sv.tracker.render(&tracked, force).await?;
  Ok(Reply::Banner { png, caption: caption(&tracked) })
}

async fn link(sv: &Services<'_>, bot: &ReplyBot, name: &str) -> Result<Reply> {
  if name.trim().is_empty() {
    return Err(Error::InvalidArgs("Usage: /link <account>".into()));
  }
  let account = Account::new(name)?;

  // only keep the link once the account is known to exist
  let reply = banner(sv, &account, false).await?;
  sv.link.link(bot.user_id, &account).await?;
  Ok(reply)
}

async fn show(
  sv: &Services<'_>,
  bot: &ReplyBot,
  name: &str,
  force: bool,
) -> Result<Reply> {
  let account = resolve(sv, bot, name).await?;
  banner(sv, &account, force).await
}

async fn clear(sv: &Services<'_>, bot: &ReplyBot, name: &str) -> Result<Reply> {
  let account = resolve(sv, bot, name).await?;
  let removed = sv.tracker.render.clear(&account).await?;
  Ok(Reply::Text(format!(
    "🧹 Removed <b>{removed}</b> cached banners of <code>{}</code>",
    html::escape(account.as_str())
  )))
}

fn top_operator(operators: &OperatorMap) -> Option<&Operator> {
  operators
    .values()
    .flatten()
    .filter(|op| !op.is_recruit())
    .max_by_key(|op| op.stats.kills)
}

fn caption(tracked: &TrackedProfile) -> String {
  let history = &tracked.history;
  let name = html::escape(&tracked.profile.name);
  let rank = history.rank();

  let mut lines = vec![if rank.is_ranked() {
    format!("<b>{name}</b> · {rank} · {} MMR", history.current)
  } else {
    format!("<b>{name}</b> · {rank}")
  }];

  if let Some(op) = top_operator(&tracked.operators) {
    lines.push(format!(
      "🎯 {} · {} kills",
      html::escape(&op.name),
      op.stats.kills
    ));
  }

  for event in &tracked.events {
    lines.push(match event {
      HistoryEvent::SeasonHigh { current, .. } => format!(
        "🏆 New season high: <b>{}</b> ({} MMR)",
        current.maximum_rank(),
        current.maximum
      ),
      HistoryEvent::RankChange { previous, current } => {
        let arrow = if current.rank() > previous.rank() { "📈" } else { "📉" };
        format!("{arrow} {} → <b>{}</b>", previous.rank(), current.rank())
      }
    });
  }

  lines.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::{SeasonHistory, profile::tests::sample};

  fn op(name: &str, image: &str, kills: u32) -> Option<Operator> {
    let mut op = Operator {
      name: name.into(),
      image_url: image.into(),
      ..Default::default()
    };
    op.stats.kills = kills;
    Some(op)
  }

  fn tracked(
    name: &str,
    mmr: u32,
    events: Vec<HistoryEvent>,
  ) -> TrackedProfile {
    let profile = sample(name, mmr);
    TrackedProfile {
      account: Account::new("alice").unwrap(),
      history: SeasonHistory::seed(7, &profile),
      profile,
      operators: HashMap::new(),
      events,
    }
  }

  #[test]
  fn quiet_caption_is_one_line() {
    let text = caption(&tracked("A<b>", 2650, Vec::new()));
    assert_eq!(text, "<b>A&lt;b&gt;</b> · Gold III · 2650 MMR");

    let text = caption(&tracked("Fresh", 0, Vec::new()));
    assert_eq!(text, "<b>Fresh</b> · Unranked");
  }

  #[test]
  fn events_add_lines() {
    let before = SeasonHistory::seed(7, &sample("Alice", 2150));
    let after = SeasonHistory::seed(7, &sample("Alice", 2650));
    let events = vec![
      HistoryEvent::SeasonHigh { previous: before, current: after },
      HistoryEvent::RankChange { previous: before, current: after },
    ];

    let mut tracked = tracked("Alice", 2650, events);
    tracked.operators = HashMap::from([
      ("ash".into(), op("Ash", "https://cdn.example/ash.png", 40)),
      ("recruit".into(), op("Recruit", "/img/recruit.png", 90)),
      ("doc".into(), None),
    ]);

    let text = caption(&tracked);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "🎯 Ash · 40 kills");
    assert!(lines[2].starts_with("🏆"));
    assert!(lines[3].starts_with("📈"));
    assert!(lines[3].contains("<b>Gold III</b>"));
  }

  #[test]
  fn commands_parse() {
    let cmd = Command::parse("/profile Alice", "dingo_bot").unwrap();
    assert!(matches!(cmd, Command::Profile(name) if name == "Alice"));

    let cmd = Command::parse("/check", "dingo_bot").unwrap();
    assert!(matches!(cmd, Command::Check(name) if name.is_empty()));
  }
}
