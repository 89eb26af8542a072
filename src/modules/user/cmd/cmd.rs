use crate::command_registry::CommandModule;
use clap::{Arg, Command};

/// User模块的命令处理器
pub struct UserCommands;

impl CommandModule for UserCommands {
    fn module_name(&self) -> &'static str {
        "user"
    }

    fn register_commands(&self) -> Vec<Command> {
        vec![
            Command::new("hash-password")
                .about("对明文密码做 Argon2 哈希并输出")
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .value_name("PASSWORD")
                        .help("要哈希的明文密码")
                        .required(true),
                ),
            Command::new("normalize-email")
                .about("输出规范化后的邮箱地址")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .value_name("EMAIL")
                        .help("要规范化的邮箱地址")
                        .required(true),
                ),
        ]
    }

    fn handle_command(
        &self,
        command_name: &str,
        matches: &clap::ArgMatches,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match command_name {
            "hash-password" => {
                let password = matches.get_one::<String>("password").unwrap();
                match crate::modules::user::password::hash_password(password) {
                    Ok(hash) => println!("{}", hash),
                    Err(e) => return Err(format!("哈希失败: {}", e).into()),
                }
            }
            "normalize-email" => {
                let email = matches.get_one::<String>("email").unwrap();
                println!("{}", crate::modules::user::service::normalize_email(email));
            }
            _ => {
                return Err(format!("未知命令: {}", command_name).into());
            }
        }
        Ok(())
    }
}

/// 注册User模块的命令
pub fn register_user_commands() {
    crate::command_registry::register_module(Box::new(UserCommands));
}
