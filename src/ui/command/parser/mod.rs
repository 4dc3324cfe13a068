//! Text command parser of the trace subsystem.

use super::{control, tracepoint, Command, CommandError, CommandResult};
use crate::debugger::tracepoint::PassTarget;
use crate::debugger::FrameSelector;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichReason};
use chumsky::prelude::{any, choice, end, just};
use chumsky::text::whitespace;
use chumsky::{extra, text, Boxed, IterParser, Parser};
use itertools::Itertools;
use std::path::PathBuf;

pub const TRACE_COMMAND: &str = "trace";
pub const INFO_COMMAND: &str = "info";
pub const TRACEPOINTS_KEYWORD: &str = "tracepoints";
pub const TRACEPOINTS_KEYWORD_SHORT: &str = "tp";
pub const ENABLE_COMMAND: &str = "enable";
pub const DISABLE_COMMAND: &str = "disable";
pub const DELETE_COMMAND: &str = "delete";
pub const PASSCOUNT_COMMAND: &str = "passcount";
pub const PASSCOUNT_ALL_KEY: &str = "all";
pub const ACTIONS_COMMAND: &str = "actions";
pub const TSTART_COMMAND: &str = "tstart";
pub const TSTOP_COMMAND: &str = "tstop";
pub const TSTATUS_COMMAND: &str = "tstatus";
pub const TFIND_COMMAND: &str = "tfind";
pub const TFIND_START_SUBCOMMAND: &str = "start";
pub const TFIND_END_SUBCOMMAND: &str = "end";
pub const TFIND_NONE_SUBCOMMAND: &str = "none";
pub const TFIND_PC_SUBCOMMAND: &str = "pc";
pub const TFIND_TRACEPOINT_SUBCOMMAND: &str = "tracepoint";
pub const TFIND_LINE_SUBCOMMAND: &str = "line";
pub const TFIND_RANGE_SUBCOMMAND: &str = "range";
pub const TFIND_OUTSIDE_SUBCOMMAND: &str = "outside";
pub const TDUMP_COMMAND: &str = "tdump";
pub const SAVE_COMMAND: &str = "save-tracepoints";
pub const SCOPE_COMMAND: &str = "scope";

type Err<'a> = extra::Err<Rich<'a, char>>;

/// Target address: hex with a `0x` prefix, or decimal.
pub fn address<'a>() -> impl Parser<'a, &'a str, u64, Err<'a>> + Clone {
    let prefix = just("0x").or(just("0X"));
    let hex = prefix.ignore_then(
        text::digits(16)
            .at_least(1)
            .to_slice()
            .map(|s: &str| u64::from_str_radix(s, 16).unwrap()),
    );
    let dec = text::int(10)
        .to_slice()
        .map(|s: &str| s.parse::<u64>().unwrap());
    hex.or(dec).padded().labelled("address")
}

/// One tracepoint number specifier: a number or a `$var` reference; the
/// store does the actual resolution.
fn spec_token<'a>() -> impl Parser<'a, &'a str, String, Err<'a>> + Clone {
    any()
        .filter(|c: &char| !c.is_whitespace())
        .repeated()
        .at_least(1)
        .to_slice()
        .map(ToString::to_string)
        .labelled("tracepoint number")
}

fn rest_of_line<'a>() -> impl Parser<'a, &'a str, String, Err<'a>> + Clone {
    any()
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| s.trim().to_string())
}

fn command<'a, I>(ctx: &'static str, inner: I) -> Boxed<'a, 'a, &'a str, Command, Err<'a>>
where
    I: Parser<'a, &'a str, Command, Err<'a>> + 'a,
{
    inner.then_ignore(end()).labelled(ctx).boxed()
}

impl Command {
    pub fn render_errors(src: &str, errors: Vec<Rich<char>>) -> String {
        let mut reports = vec![];

        for err in errors {
            let message = match err.reason() {
                RichReason::ExpectedFound { expected, found } => format!(
                    "{}, expected {}",
                    if found.is_some() {
                        "unexpected token in input"
                    } else {
                        "unexpected end of input"
                    },
                    if expected.is_empty() {
                        "something else".to_string()
                    } else {
                        expected.iter().map(|e| e.to_string()).join(", ")
                    }
                ),
                reason => reason.to_string(),
            };

            let mut buf = vec![];
            _ = Report::build(ReportKind::Error, "<command>", err.span().start)
                .with_message(message)
                .with_label(
                    Label::new(("<command>", err.span().into_range()))
                        .with_message(format!(
                            "unexpected token {}",
                            err.found()
                                .map(|t| t.to_string())
                                .unwrap_or("EOL".to_string())
                                .fg(Color::Red)
                        ))
                        .with_color(Color::Red),
                )
                .finish()
                .write_for_stdout(("<command>", Source::from(&src)), &mut buf);
            reports.push(String::from_utf8_lossy(&buf).into_owned());
        }

        reports.join("\n")
    }

    fn parser<'a>() -> impl Parser<'a, &'a str, Command, Err<'a>> {
        let ws_req = whitespace().at_least(1);
        let ws_req_or_end = ws_req.or(end());
        let op = |sym| whitespace().then(just(sym)).then(ws_req_or_end);
        let op_w_arg = |sym| whitespace().then(just(sym)).then(ws_req);
        let sub_op = |sym| just(sym).then(ws_req_or_end);
        let sub_op_w_arg = |sym| just(sym).then(ws_req);

        let trace = op_w_arg(TRACE_COMMAND)
            .ignore_then(rest_of_line())
            .map(Command::Trace)
            .boxed();

        let tracepoints_kw = sub_op(TRACEPOINTS_KEYWORD).or(sub_op(TRACEPOINTS_KEYWORD_SHORT));

        let info = op_w_arg(INFO_COMMAND)
            .ignore_then(tracepoints_kw.clone())
            .ignore_then(spec_token().padded().or_not())
            .map(|spec| Command::Tracepoint(tracepoint::Command::Info(spec)))
            .boxed();

        let specs = spec_token().padded().repeated().collect::<Vec<String>>();

        let enable = op_w_arg(ENABLE_COMMAND)
            .ignore_then(tracepoints_kw.clone())
            .ignore_then(specs.clone())
            .map(|s| Command::Tracepoint(tracepoint::Command::Enable(s)))
            .boxed();
        let disable = op_w_arg(DISABLE_COMMAND)
            .ignore_then(tracepoints_kw.clone())
            .ignore_then(specs.clone())
            .map(|s| Command::Tracepoint(tracepoint::Command::Disable(s)))
            .boxed();
        let delete = op_w_arg(DELETE_COMMAND)
            .ignore_then(tracepoints_kw)
            .ignore_then(specs)
            .map(|s| Command::Tracepoint(tracepoint::Command::Delete(s)))
            .boxed();

        let pass_target = choice((
            sub_op(PASSCOUNT_ALL_KEY).to(PassTarget::All),
            spec_token().map(PassTarget::Spec),
        ))
        .padded()
        .or_not()
        .map(|target| target.unwrap_or(PassTarget::Last));
        let passcount = op_w_arg(PASSCOUNT_COMMAND)
            .ignore_then(
                text::int(10)
                    .to_slice()
                    .map(|s: &str| s.parse::<u64>().unwrap())
                    .padded(),
            )
            .then(pass_target)
            .map(|(count, target)| {
                Command::Tracepoint(tracepoint::Command::Pass { count, target })
            })
            .boxed();

        let actions = op_w_arg(ACTIONS_COMMAND)
            .ignore_then(spec_token().padded())
            .map(Command::Actions)
            .or(op(ACTIONS_COMMAND).map(|_| Command::Actions(String::new())))
            .boxed();

        let tstart = op(TSTART_COMMAND)
            .to(Command::Control(control::Command::Start))
            .boxed();
        let tstop = op(TSTOP_COMMAND)
            .to(Command::Control(control::Command::Stop))
            .boxed();
        let tstatus = op(TSTATUS_COMMAND)
            .to(Command::Control(control::Command::Status))
            .boxed();

        let signed_frame = just('-')
            .or_not()
            .then(text::int(10).to_slice().map(|s: &str| s.parse::<i64>().unwrap()))
            .map(|(minus, n)| if minus.is_some() { -n } else { n })
            .padded();
        let addr_pair = address().then_ignore(just(',')).then(address());

        let tfind_selector = choice((
            sub_op(TFIND_START_SUBCOMMAND).to(FrameSelector::Start),
            sub_op(TFIND_END_SUBCOMMAND).to(FrameSelector::End),
            sub_op(TFIND_NONE_SUBCOMMAND).to(FrameSelector::End),
            sub_op_w_arg(TFIND_PC_SUBCOMMAND)
                .ignore_then(address())
                .map(|addr| FrameSelector::Pc(Some(addr)))
                .or(sub_op(TFIND_PC_SUBCOMMAND).to(FrameSelector::Pc(None))),
            sub_op_w_arg(TFIND_TRACEPOINT_SUBCOMMAND)
                .ignore_then(
                    text::int(10)
                        .to_slice()
                        .map(|s: &str| s.parse::<u32>().unwrap())
                        .padded(),
                )
                .map(|n| FrameSelector::Tracepoint(Some(n)))
                .or(sub_op(TFIND_TRACEPOINT_SUBCOMMAND).to(FrameSelector::Tracepoint(None))),
            sub_op_w_arg(TFIND_LINE_SUBCOMMAND)
                .ignore_then(rest_of_line())
                .map(|location| FrameSelector::Line(Some(location)))
                .or(sub_op(TFIND_LINE_SUBCOMMAND).to(FrameSelector::Line(None))),
            sub_op_w_arg(TFIND_RANGE_SUBCOMMAND)
                .ignore_then(addr_pair.clone())
                .map(|(start, end)| FrameSelector::Range(start, end)),
            sub_op_w_arg(TFIND_OUTSIDE_SUBCOMMAND)
                .ignore_then(addr_pair)
                .map(|(start, end)| FrameSelector::Outside(start, end)),
            signed_frame.map(FrameSelector::Number),
            just('-').padded().to(FrameSelector::Prev),
        ));
        let tfind = op_w_arg(TFIND_COMMAND)
            .ignore_then(tfind_selector)
            .map(Command::Find)
            .or(op(TFIND_COMMAND).to(Command::Find(FrameSelector::Next)))
            .boxed();

        let tdump = op(TDUMP_COMMAND).to(Command::Dump).boxed();

        let save = op_w_arg(SAVE_COMMAND)
            .ignore_then(rest_of_line())
            .map(|path| Command::Save(PathBuf::from(path)))
            .boxed();

        let scope = op_w_arg(SCOPE_COMMAND)
            .ignore_then(rest_of_line())
            .map(Command::Scope)
            .boxed();

        choice((
            command(TRACE_COMMAND, trace),
            command(INFO_COMMAND, info),
            command(ENABLE_COMMAND, enable),
            command(DISABLE_COMMAND, disable),
            command(DELETE_COMMAND, delete),
            command(PASSCOUNT_COMMAND, passcount),
            command(ACTIONS_COMMAND, actions),
            command(TSTART_COMMAND, tstart),
            command(TSTOP_COMMAND, tstop),
            command(TSTATUS_COMMAND, tstatus),
            command(TFIND_COMMAND, tfind),
            command(TDUMP_COMMAND, tdump),
            command(SAVE_COMMAND, save),
            command(SCOPE_COMMAND, scope),
        ))
    }

    /// Parse input string into command.
    pub fn parse(input: &str) -> CommandResult<Command> {
        Self::parser()
            .parse(input)
            .into_result()
            .map_err(|e| CommandError::Parsing(Self::render_errors(input, e)))
    }
}
