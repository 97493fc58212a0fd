use color_eyre::Result;
use repipe_core::{
    install, CommandContext, CommandGroup, CommandInfo, ExecutionOutcome, InstallRequest,
};
use serde_json::json;

use crate::cli::{CommandGroupCli, InstallArgs};

pub fn dispatch_command(
    ctx: &CommandContext,
    group: &CommandGroupCli,
) -> Result<(CommandInfo, ExecutionOutcome)> {
    match group {
        CommandGroupCli::Install(args) => {
            let info = CommandInfo::new(CommandGroup::Install, "install");
            let request = install_request_from_args(args);
            core_call(info, || install(ctx, &request))
        }
    }
}

fn install_request_from_args(args: &InstallArgs) -> InstallRequest {
    InstallRequest {
        requirements: args.requirements.clone(),
        packages: args.packages.clone(),
    }
}

fn core_call<F>(info: CommandInfo, action: F) -> Result<(CommandInfo, ExecutionOutcome)>
where
    F: FnOnce() -> anyhow::Result<ExecutionOutcome>,
{
    match action() {
        Ok(outcome) => Ok((info, outcome)),
        Err(err) => {
            tracing::debug!(error = ?err, command = info.name, "command raised an error");
            Ok((
                info,
                ExecutionOutcome::failure(
                    format!("{} failed", info.name),
                    json!({ "reason": "internal", "error": format!("{err:#}") }),
                ),
            ))
        }
    }
}
