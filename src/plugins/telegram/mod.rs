mod command;

use command::Command;
use teloxide::{
  Bot,
  dispatching::{Dispatcher, HandlerExt, UpdateFilterExt},
  prelude::*,
  types::{ChatId, InputFile, Message, ParseMode, Update},
};

use crate::{prelude::*, state::AppState};

pub struct Plugin {
  bot: Bot,
}

impl Plugin {
  pub fn new(token: impl Into<String>) -> Self {
    Self { bot: Bot::new(token) }
  }
}

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "telegram"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    run_bot(self.bot.clone(), app).await;
    Ok(())
  }
}

pub async fn run_bot(bot: Bot, app: Arc<AppState>) {
  info!("Starting Telegram bot...");

  let handler = teloxide::dptree::entry().branch(
    Update::filter_message().filter_command::<Command>().endpoint(
      move |bot: Bot, msg: Message, cmd: Command| {
        let app = app.clone();
        let user_id =
          msg.from.as_ref().map_or(msg.chat.id.0, |user| user.id.0 as i64);
        let bot = ReplyBot::new(bot, user_id, msg.chat.id);
        command::handle(app, bot, cmd)
      },
    ),
  );

  Dispatcher::builder(bot, handler).build().dispatch().await;
}

#[derive(Debug, Clone)]
struct ReplyBot {
  inner: Bot,
  pub user_id: i64,
  pub chat_id: ChatId,
}

impl ReplyBot {
  pub fn new(inner: Bot, user_id: i64, chat_id: ChatId) -> Self {
    Self { inner, user_id, chat_id }
  }

  async fn reply_html(
    &self,
    text: impl Into<String>,
  ) -> ResponseResult<Message> {
    self
      .inner
      .send_message(self.chat_id, text.into())
      .parse_mode(ParseMode::Html)
      .await
  }

  async fn reply_banner(
    &self,
    png: Vec<u8>,
    caption: impl Into<String>,
  ) -> ResponseResult<Message> {
    let photo = InputFile::memory(png).file_name("profile.png");
    self
      .inner
      .send_photo(self.chat_id, photo)
      .caption(caption.into())
      .parse_mode(ParseMode::Html)
      .await
  }
}
