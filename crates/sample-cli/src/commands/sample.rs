//! `sample-*` commands.

use crate::commands::CommandSpec;
use crate::error::{CliError, CliResult};
use crate::output::{print_dict, print_list, DEFAULT_WRAP};
use crate::resource_fields::{
    ResourceFields, CHILD_DETAILED_RESOURCE, CHILD_RESOURCE, SAMPLE_CREATE_FIELDS,
    SAMPLE_DETAILED_RESOURCE, SAMPLE_RESOURCE, SAMPLE_SHOW_FIELDS,
};
use crate::utils::{
    args_array_to_dict, args_array_to_patch, check_empty_arg, common_params_for_list, ListArgs,
};
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use futures::future::BoxFuture;
use sample_client::v1::{Client, CreateSample, Sample};
use sample_core::PatchOp;
use std::io::Write;
use tracing::debug;

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "sample-show",
        about: "Show detailed information about a sample.",
        args: show_args,
        handler: do_sample_show,
    },
    CommandSpec {
        name: "sample-list",
        about: "List the samples.",
        args: list_args,
        handler: do_sample_list,
    },
    CommandSpec {
        name: "sample-create",
        about: "Create a new sample.",
        args: create_args,
        handler: do_sample_create,
    },
    CommandSpec {
        name: "sample-delete",
        about: "Delete a sample.",
        args: delete_args,
        handler: do_sample_delete,
    },
    CommandSpec {
        name: "sample-update",
        about: "Update information about a sample.",
        args: update_args,
        handler: do_sample_update,
    },
    CommandSpec {
        name: "sample-child-list",
        about: "List the children of a sample.",
        args: child_list_args,
        handler: do_sample_child_list,
    },
];

fn sample_arg() -> Arg {
    Arg::new("sample")
        .value_name("sample")
        .required(true)
        .help("UUID of the sample.")
}

fn pagination_args(noun: &str) -> Vec<Arg> {
    vec![
        Arg::new("detail")
            .long("detail")
            .action(ArgAction::SetTrue)
            .help(format!("Show detailed information about the {noun}.")),
        Arg::new("limit")
            .long("limit")
            .value_name("limit")
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true)
            .help(format!(
                "Maximum number of {noun} to return per request, 0 for no limit. \
                 Default is the maximum number used by the Sample API service."
            )),
        Arg::new("marker")
            .long("marker")
            .value_name("marker")
            .help("UUID of the last item of the previous page; listing starts after it."),
        Arg::new("sort_key")
            .long("sort-key")
            .value_name("field")
            .help(format!("Field of the {noun} used for sorting.")),
        Arg::new("sort_dir")
            .long("sort-dir")
            .value_name("direction")
            .value_parser(["asc", "desc"])
            .help("Sort direction: \"asc\" (the default) or \"desc\"."),
    ]
}

fn list_args_from(matches: &ArgMatches) -> ListArgs {
    ListArgs {
        limit: matches.get_one::<i64>("limit").copied(),
        marker: matches.get_one::<String>("marker").cloned(),
        sort_key: matches.get_one::<String>("sort_key").cloned(),
        sort_dir: matches.get_one::<String>("sort_dir").cloned(),
        detail: matches.get_flag("detail"),
    }
}

fn required<'m>(matches: &'m ArgMatches, name: &str) -> CliResult<&'m str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| CliError::command(format!("Missing required argument <{name}>")))
}

fn required_many<'m>(matches: &'m ArgMatches, name: &str) -> Vec<&'m String> {
    matches
        .get_many::<String>(name)
        .map(Iterator::collect)
        .unwrap_or_default()
}

fn print_sample_show(out: &mut dyn Write, sample: &Sample) -> CliResult<()> {
    print_dict(out, sample, SAMPLE_SHOW_FIELDS, DEFAULT_WRAP)
}

fn show_args() -> Vec<Arg> {
    vec![sample_arg()]
}

fn do_sample_show<'a>(
    client: &'a Client,
    args: &'a ArgMatches,
    out: &'a mut (dyn Write + Send),
) -> BoxFuture<'a, CliResult<()>> {
    Box::pin(sample_show(client, args, out))
}

async fn sample_show(
    client: &Client,
    args: &ArgMatches,
    out: &mut (dyn Write + Send),
) -> CliResult<()> {
    let id = required(args, "sample")?;
    check_empty_arg(id, "<sample>")?;

    let sample = client
        .sample()
        .get(id)
        .await?
        .ok_or_else(|| CliError::command(format!("Sample {id} could not be found.")))?;
    print_sample_show(out, &sample)
}

fn list_args() -> Vec<Arg> {
    pagination_args("samples")
}

fn do_sample_list<'a>(
    client: &'a Client,
    args: &'a ArgMatches,
    out: &'a mut (dyn Write + Send),
) -> BoxFuture<'a, CliResult<()>> {
    Box::pin(sample_list(client, args, out))
}

async fn sample_list(
    client: &Client,
    args: &ArgMatches,
    out: &mut (dyn Write + Send),
) -> CliResult<()> {
    let list_args = list_args_from(args);
    let columns = field_set(list_args.detail, &SAMPLE_DETAILED_RESOURCE, &SAMPLE_RESOURCE);
    let options = common_params_for_list(&list_args, columns)?;

    let samples = client.sample().list(&options).await?;
    debug!(count = samples.len(), "Listed samples");
    print_list(out, &samples, columns)
}

fn create_args() -> Vec<Arg> {
    vec![
        Arg::new("description")
            .short('d')
            .long("description")
            .value_name("description")
            .help("Description of the sample."),
        Arg::new("extra")
            .short('e')
            .long("extra")
            .value_name("key=value")
            .action(ArgAction::Append)
            .help("Record arbitrary key/value metadata. Can be specified multiple times."),
    ]
}

fn do_sample_create<'a>(
    client: &'a Client,
    args: &'a ArgMatches,
    out: &'a mut (dyn Write + Send),
) -> BoxFuture<'a, CliResult<()>> {
    Box::pin(sample_create(client, args, out))
}

async fn sample_create(
    client: &Client,
    args: &ArgMatches,
    out: &mut (dyn Write + Send),
) -> CliResult<()> {
    let mut request = CreateSample::new();
    if let Some(description) = args.get_one::<String>("description") {
        request = request.with_description(description.clone());
    }
    if let Some(pairs) = args.get_many::<String>("extra") {
        let pairs: Vec<String> = pairs.cloned().collect();
        request = request.with_extra(args_array_to_dict(&pairs)?);
    }

    let sample = client.sample().create(&request).await?;
    print_dict(out, &sample, SAMPLE_CREATE_FIELDS, DEFAULT_WRAP)
}

fn delete_args() -> Vec<Arg> {
    vec![sample_arg().num_args(1..).action(ArgAction::Append)]
}

fn do_sample_delete<'a>(
    client: &'a Client,
    args: &'a ArgMatches,
    out: &'a mut (dyn Write + Send),
) -> BoxFuture<'a, CliResult<()>> {
    Box::pin(sample_delete(client, args, out))
}

// Stops at the first failure; later samples are not attempted.
async fn sample_delete(
    client: &Client,
    args: &ArgMatches,
    out: &mut (dyn Write + Send),
) -> CliResult<()> {
    let ids = required_many(args, "sample");
    for id in &ids {
        check_empty_arg(id, "<sample>")?;
    }
    for id in ids {
        client.sample().delete(id).await?;
        writeln!(out, "Deleted sample {id}")?;
    }
    Ok(())
}

fn update_args() -> Vec<Arg> {
    vec![
        sample_arg(),
        Arg::new("op")
            .value_name("op")
            .required(true)
            .value_parser(["add", "replace", "remove"])
            .help("Operation: 'add', 'replace', or 'remove'."),
        Arg::new("attributes")
            .value_name("path=value")
            .required(true)
            .num_args(1..)
            .action(ArgAction::Append)
            .help(
                "Attribute to add, replace, or remove. Can be specified multiple times. \
                 For 'remove', only <path> is necessary.",
            ),
    ]
}

fn do_sample_update<'a>(
    client: &'a Client,
    args: &'a ArgMatches,
    out: &'a mut (dyn Write + Send),
) -> BoxFuture<'a, CliResult<()>> {
    Box::pin(sample_update(client, args, out))
}

async fn sample_update(
    client: &Client,
    args: &ArgMatches,
    out: &mut (dyn Write + Send),
) -> CliResult<()> {
    let id = required(args, "sample")?;
    check_empty_arg(id, "<sample>")?;
    let op: PatchOp = required(args, "op")?.parse()?;
    let attributes: Vec<String> = required_many(args, "attributes")
        .into_iter()
        .cloned()
        .collect();
    let patch = args_array_to_patch(op, &attributes)?;

    let sample = client.sample().update(id, &patch).await?;
    print_sample_show(out, &sample)
}

fn child_list_args() -> Vec<Arg> {
    let mut args = vec![sample_arg()];
    args.extend(pagination_args("children"));
    args
}

fn do_sample_child_list<'a>(
    client: &'a Client,
    args: &'a ArgMatches,
    out: &'a mut (dyn Write + Send),
) -> BoxFuture<'a, CliResult<()>> {
    Box::pin(sample_child_list(client, args, out))
}

async fn sample_child_list(
    client: &Client,
    args: &ArgMatches,
    out: &mut (dyn Write + Send),
) -> CliResult<()> {
    let id = required(args, "sample")?;
    check_empty_arg(id, "<sample>")?;
    let list_args = list_args_from(args);
    let columns = field_set(list_args.detail, &CHILD_DETAILED_RESOURCE, &CHILD_RESOURCE);
    let options = common_params_for_list(&list_args, columns)?;

    let children = client.sample().list_children(id, &options).await?;
    print_list(out, &children, columns)
}

fn field_set<'f>(
    detail: bool,
    detailed: &'f ResourceFields,
    summary: &'f ResourceFields,
) -> &'f ResourceFields {
    if detail {
        detailed
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::find;
    use crate::error::{CliError, CliResult};
    use sample_client::v1::Client;
    use sample_core::Error;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn run(server: &MockServer, argv: &[&str]) -> (CliResult<()>, String) {
        let client = Client::new(server.uri()).unwrap();
        let spec = find(argv[0]).unwrap();
        let matches = spec
            .command()
            .try_get_matches_from(argv.iter().copied())
            .unwrap();
        let mut out = Vec::new();
        let result = (spec.handler)(&client, &matches, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn show_prints_fixed_projection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/sample/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": "u1",
                "description": "first",
                "created_at": "2024-03-01T10:20:30+00:00",
                "extra": {"a": "1"},
                "links": []
            })))
            .mount(&server)
            .await;

        let (result, out) = run(&server, &["sample-show", "u1"]).await;
        result.unwrap();
        for expected in ["uuid", "description", "created_at", "updated_at", "extra", "first"] {
            assert!(out.contains(expected), "missing {expected} in\n{out}");
        }
        assert!(!out.contains("links"));
    }

    #[tokio::test]
    async fn show_rejects_blank_id() {
        let server = MockServer::start().await;
        let (result, _) = run(&server, &["sample-show", " "]).await;
        assert!(matches!(result, Err(CliError::Command(_))));
    }

    #[tokio::test]
    async fn show_missing_sample_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/sample/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (result, _) = run(&server, &["sample-show", "ghost"]).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Sample ghost could not be found."
        );
    }

    #[tokio::test]
    async fn list_detail_uses_detailed_columns() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/sample/detail"))
            .and(query_param("limit", "5"))
            .and(query_param("sort_key", "created_at"))
            .and(query_param("sort_dir", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sample": [{"uuid": "a", "description": "one", "extra": {}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (result, out) = run(
            &server,
            &[
                "sample-list",
                "--detail",
                "--limit",
                "5",
                "--sort-key",
                "Created At",
                "--sort-dir",
                "desc",
            ],
        )
        .await;
        result.unwrap();
        assert!(out.contains("Created At"));
        assert!(out.contains("one"));
    }

    #[tokio::test]
    async fn list_rejects_detail_only_sort_key_in_summary_mode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (result, _) = run(&server, &["sample-list", "--sort-key", "created_at"]).await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("invalid field for sorting"), "{message}");
    }

    #[tokio::test]
    async fn list_rejects_negative_limit() {
        let server = MockServer::start().await;
        let (result, _) = run(&server, &["sample-list", "--limit", "-3"]).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Expected non-negative --limit, got -3"
        );
    }

    #[tokio::test]
    async fn create_sends_description_and_extra() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sample"))
            .and(body_json(json!({"description": "x", "extra": {"a": "1", "b": "2"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "uuid": "new-uuid",
                "description": "x",
                "extra": {"a": "1", "b": "2"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (result, out) = run(
            &server,
            &["sample-create", "-d", "x", "-e", "a=1", "--extra", "b=2"],
        )
        .await;
        result.unwrap();
        assert!(out.contains("new-uuid"));
        assert!(out.contains("description"));
    }

    #[tokio::test]
    async fn create_rejects_malformed_extra() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let (result, _) = run(&server, &["sample-create", "-e", "novalue"]).await;
        assert!(matches!(result, Err(CliError::Command(_))));
    }

    #[tokio::test]
    async fn delete_reports_each_sample() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&server)
            .await;

        let (result, out) = run(&server, &["sample-delete", "a", "b"]).await;
        result.unwrap();
        assert_eq!(out, "Deleted sample a\nDeleted sample b\n");
    }

    #[tokio::test]
    async fn delete_aborts_on_first_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/sample/ok"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/sample/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such sample"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/sample/never"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let (result, out) = run(&server, &["sample-delete", "ok", "missing", "never"]).await;
        assert!(matches!(
            result,
            Err(CliError::Client(Error::NotFound(_)))
        ));
        assert_eq!(out, "Deleted sample ok\n");
    }

    #[tokio::test]
    async fn delete_rejects_blank_id_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let (result, out) = run(&server, &["sample-delete", "a", ""]).await;
        assert!(matches!(result, Err(CliError::Command(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn update_rejects_blank_id() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (result, _) = run(&server, &["sample-update", "  ", "remove", "extra/a"]).await;
        assert!(matches!(result, Err(CliError::Command(_))));
    }

    #[tokio::test]
    async fn update_builds_patch_from_arguments() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/sample/u1"))
            .and(body_json(json!([
                {"op": "add", "path": "/extra/count", "value": 3},
                {"op": "add", "path": "/description", "value": "new text"}
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": "u1",
                "description": "new text",
                "extra": {"count": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (result, out) = run(
            &server,
            &["sample-update", "u1", "add", "extra/count=3", "description=new text"],
        )
        .await;
        result.unwrap();
        assert!(out.contains("new text"));
    }

    #[tokio::test]
    async fn update_remove_needs_only_paths() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/sample/u1"))
            .and(body_json(json!([{"op": "remove", "path": "/extra/a"}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "u1"})))
            .expect(1)
            .mount(&server)
            .await;

        let (result, _) = run(&server, &["sample-update", "u1", "remove", "extra/a"]).await;
        result.unwrap();
    }

    #[tokio::test]
    async fn child_list_scopes_to_parent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/sample/p1/children"))
            .and(query_param_is_missing("limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "children": [{"uuid": "c1", "description": "kid"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (result, out) = run(&server, &["sample-child-list", "p1", "--limit", "0"]).await;
        result.unwrap();
        assert!(out.contains("c1"));
        assert!(out.contains("kid"));
    }
}
