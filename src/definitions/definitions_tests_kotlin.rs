//! Kotlin parser tests: grpc-kotlin generated code, coroutine servers, call sites.

use super::*;

fn kotlin_parser() -> tree_sitter::Parser {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_kotlin::LANGUAGE.into()).unwrap();
    parser
}

const GENERATED_GRPC_KT: &str = r#"
package com.acme.user

import io.grpc.kotlin.AbstractCoroutineServerImpl

object UserServiceGrpcKt {
    const val SERVICE_NAME: String = "acme.UserService"

    abstract class UserServiceCoroutineImplBase(
        coroutineContext: CoroutineContext = EmptyCoroutineContext
    ) : AbstractCoroutineServerImpl(coroutineContext) {
        open suspend fun getUser(request: GetUserRequest): User =
            throw StatusException(UNIMPLEMENTED.withDescription("Method acme.UserService.GetUser is unimplemented"))

        open suspend fun deleteUser(request: DeleteUserRequest): Empty =
            throw StatusException(UNIMPLEMENTED.withDescription("Method acme.UserService.DeleteUser is unimplemented"))
    }

    class UserServiceCoroutineStub(channel: Channel) : AbstractCoroutineStub<UserServiceCoroutineStub>(channel) {
        suspend fun getUser(request: GetUserRequest): User = unaryRpc(channel, getUserMethod, request)
    }
}
"#;

const SERVER_KT: &str = r#"
package com.acme.user.server

import com.acme.user.UserServiceGrpcKt

@GrpcService
class UserServiceGrpcService(
    private val repository: UserRepository
) : UserServiceGrpcKt.UserServiceCoroutineImplBase() {

    override suspend fun getUser(request: GetUserRequest): User {
        return repository.find(request.id)
    }
}
"#;

const CLIENT_KT: &str = r#"package com.acme.web

class UserController(private val userServiceStub: UserServiceGrpcKt.UserServiceCoroutineStub) {
    suspend fun show(id: Long): User {
        val direct = userServiceStub.getUser(request(id))
        val viaThis = this.userServiceStub.deleteUser(request(id))
        val chained = userServiceStub.withDeadlineAfter(3, TimeUnit.SECONDS).getUser(request(id))
        log(id)
        return direct
    }
}
"#;

/// 1-based column of the first occurrence of `needle` on a 1-based line.
fn col_of(source: &str, line: u32, needle: &str) -> u32 {
    let text = source.lines().nth(line as usize - 1).unwrap();
    text.find(needle).unwrap() as u32 + 1
}

// ─── Declarations ───────────────────────────────────────────────────

#[test]
fn test_parse_generated_coroutine_service() {
    let defs = parse_kotlin_definitions(&mut kotlin_parser(), GENERATED_GRPC_KT, 0);

    let outer = defs.iter().find(|d| d.name == "UserServiceGrpcKt").unwrap();
    assert_eq!(outer.kind, DefinitionKind::Object);
    assert_eq!(outer.qualified_name, "com.acme.user.UserServiceGrpcKt");
    assert_eq!(outer.parent, None);

    let base = defs.iter().find(|d| d.name == "UserServiceCoroutineImplBase").unwrap();
    assert_eq!(base.kind, DefinitionKind::Class);
    assert_eq!(base.qualified_name, "com.acme.user.UserServiceGrpcKt.UserServiceCoroutineImplBase");
    assert_eq!(base.package.as_deref(), Some("com.acme.user"));
    assert_eq!(base.base_types, vec!["AbstractCoroutineServerImpl"]);

    let stub = defs.iter().find(|d| d.name == "UserServiceCoroutineStub").unwrap();
    assert_eq!(stub.base_types, vec!["AbstractCoroutineStub<UserServiceCoroutineStub>"]);

    let get_users: Vec<_> = defs.iter()
        .filter(|d| d.kind == DefinitionKind::Method && d.name == "getUser")
        .collect();
    assert_eq!(get_users.len(), 2);
    assert!(get_users.iter().any(|d| d.parent.as_deref() == Some(base.qualified_name.as_str())));

    let delete = defs.iter().find(|d| d.name == "deleteUser").unwrap();
    assert_eq!(delete.qualified_name, "com.acme.user.UserServiceGrpcKt.UserServiceCoroutineImplBase.deleteUser");
}

#[test]
fn test_function_bodies_and_properties_are_not_indexed() {
    let defs = parse_kotlin_definitions(&mut kotlin_parser(), GENERATED_GRPC_KT, 0);
    assert!(defs.iter().all(|d| d.name != "unaryRpc"));
    assert!(defs.iter().all(|d| d.name != "StatusException"));
    assert!(defs.iter().all(|d| d.name != "SERVICE_NAME"));
}

#[test]
fn test_parse_server_delegation_and_signature() {
    let defs = parse_kotlin_definitions(&mut kotlin_parser(), SERVER_KT, 4);

    let class = defs.iter().find(|d| d.kind == DefinitionKind::Class).unwrap();
    assert_eq!(class.name, "UserServiceGrpcService");
    assert_eq!(class.file_id, 4);
    assert_eq!(class.qualified_name, "com.acme.user.server.UserServiceGrpcService");
    assert_eq!(class.base_types, vec!["UserServiceGrpcKt.UserServiceCoroutineImplBase"]);
    assert_eq!(class.line, 7);

    let method = defs.iter().find(|d| d.name == "getUser").unwrap();
    assert_eq!(method.kind, DefinitionKind::Method);
    assert_eq!(method.line, 11);
    assert_eq!(method.column, 26);
    let sig = method.signature.as_deref().unwrap();
    assert_eq!(sig, "override suspend fun getUser(request: GetUserRequest): User");
}

#[test]
fn test_parse_interface_and_enum_class() {
    let source = r#"
interface Greeter : Named {
    fun greet(name: String): String
}

enum class Status : Labeled {
    ACTIVE, INACTIVE;

    fun label(): String = name.lowercase()
}
"#;
    let defs = parse_kotlin_definitions(&mut kotlin_parser(), source, 0);

    let greeter = defs.iter().find(|d| d.name == "Greeter").unwrap();
    assert_eq!(greeter.kind, DefinitionKind::Interface);
    assert_eq!(greeter.qualified_name, "Greeter");
    assert_eq!(greeter.base_types, vec!["Named"]);
    let greet = defs.iter().find(|d| d.name == "greet").unwrap();
    assert_eq!(greet.parent.as_deref(), Some("Greeter"));

    let status = defs.iter().find(|d| d.name == "Status").unwrap();
    assert_eq!(status.kind, DefinitionKind::Enum);
    let label = defs.iter().find(|d| d.name == "label").unwrap();
    assert_eq!(label.parent.as_deref(), Some("Status"));
}

#[test]
fn test_top_level_functions_are_skipped() {
    let source = "fun main() {\n    class Local { fun hidden() {} }\n}\n";
    let defs = parse_kotlin_definitions(&mut kotlin_parser(), source, 0);
    assert!(defs.is_empty());
}

// ─── Call sites ─────────────────────────────────────────────────────

#[test]
fn test_call_site_on_method_name() {
    let col = col_of(CLIENT_KT, 5, "getUser") + 2;
    let call = extract_call_site(&mut kotlin_parser(), CLIENT_KT, 5, col).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_on_receiver() {
    let col = col_of(CLIENT_KT, 5, "userServiceStub") + 3;
    let call = extract_call_site(&mut kotlin_parser(), CLIENT_KT, 5, col).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_inside_unqualified_argument_call() {
    let col = col_of(CLIENT_KT, 5, "request(") + 1;
    let call = extract_call_site(&mut kotlin_parser(), CLIENT_KT, 5, col).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_through_this_navigation() {
    let col = col_of(CLIENT_KT, 6, "deleteUser") + 1;
    let call = extract_call_site(&mut kotlin_parser(), CLIENT_KT, 6, col).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "deleteUser"));
}

#[test]
fn test_call_site_through_call_chain() {
    let col = col_of(CLIENT_KT, 7, ".getUser") + 2;
    let call = extract_call_site(&mut kotlin_parser(), CLIENT_KT, 7, col).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_unqualified_call_is_none() {
    let col = col_of(CLIENT_KT, 8, "log") + 1;
    assert!(extract_call_site(&mut kotlin_parser(), CLIENT_KT, 8, col).is_none());
}

#[test]
fn test_call_site_out_of_range_is_none() {
    assert!(extract_call_site(&mut kotlin_parser(), CLIENT_KT, 0, 1).is_none());
    assert!(extract_call_site(&mut kotlin_parser(), CLIENT_KT, 500, 1).is_none());
}
