//! Java parser tests: declarations and call-site extraction.

use super::*;

fn java_parser() -> tree_sitter::Parser {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_java::LANGUAGE.into()).unwrap();
    parser
}

const GENERATED_GRPC: &str = r#"
package com.acme.user;

import io.grpc.stub.StreamObserver;

public final class UserServiceGrpc {
    private UserServiceGrpc() {}

    public static abstract class UserServiceImplBase implements io.grpc.BindableService {
        public void getUser(GetUserRequest request, StreamObserver<User> responseObserver) {
            asyncUnimplementedUnaryCall(getGetUserMethod(), responseObserver);
        }

        public void deleteUser(DeleteUserRequest request, StreamObserver<Empty> responseObserver) {
        }
    }

    public static final class UserServiceBlockingStub extends AbstractBlockingStub<UserServiceBlockingStub> {
        public User getUser(GetUserRequest request) {
            return blockingUnaryCall(getChannel(), getGetUserMethod(), getCallOptions(), request);
        }
    }
}
"#;

const SERVER_IMPL: &str = r#"
package com.acme.user.server;

import org.springframework.stereotype.Service;

@Service
@GrpcService(interceptors = { LoggingInterceptor.class })
public class UserServiceGrpcService extends UserServiceGrpc.UserServiceImplBase {

    private final UserRepository repository;

    public UserServiceGrpcService(UserRepository repository) {
        this.repository = repository;
    }

    @Override
    public void getUser(GetUserRequest request, StreamObserver<User> responseObserver) {
        responseObserver.onNext(repository.find(request.getId()));
        responseObserver.onCompleted();
    }
}
"#;

const CLIENT: &str = r#"package com.acme.web;

public class UserController {
    private final UserServiceGrpc.UserServiceBlockingStub userServiceStub;

    public User show(long id) {
        User direct = userServiceStub.getUser(request(id));
        User viaThis = this.userServiceStub.getUser(request(id));
        User chained = userServiceStub.withDeadlineAfter(3, TimeUnit.SECONDS).getUser(request(id));
        log(id);
        return direct;
    }
}
"#;

// ─── Declarations ───────────────────────────────────────────────────

#[test]
fn test_parse_generated_grpc_nested_classes() {
    let defs = parse_java_definitions(&mut java_parser(), GENERATED_GRPC, 0);

    let outer = defs.iter().find(|d| d.name == "UserServiceGrpc").unwrap();
    assert_eq!(outer.kind, DefinitionKind::Class);
    assert_eq!(outer.qualified_name, "com.acme.user.UserServiceGrpc");
    assert_eq!(outer.parent, None);

    let base = defs.iter().find(|d| d.name == "UserServiceImplBase").unwrap();
    assert_eq!(base.qualified_name, "com.acme.user.UserServiceGrpc.UserServiceImplBase");
    assert_eq!(base.parent.as_deref(), Some("com.acme.user.UserServiceGrpc"));
    assert_eq!(base.base_types, vec!["io.grpc.BindableService"]);
    assert_eq!(base.package.as_deref(), Some("com.acme.user"));

    let get_users: Vec<_> = defs.iter()
        .filter(|d| d.kind == DefinitionKind::Method && d.name == "getUser")
        .collect();
    assert_eq!(get_users.len(), 2);
    assert!(get_users.iter().any(|d| d.parent.as_deref() == Some("com.acme.user.UserServiceGrpc.UserServiceImplBase")));
    assert!(get_users.iter().any(|d| d.parent.as_deref() == Some("com.acme.user.UserServiceGrpc.UserServiceBlockingStub")));

    let stub = defs.iter().find(|d| d.name == "UserServiceBlockingStub").unwrap();
    assert_eq!(stub.base_types, vec!["AbstractBlockingStub<UserServiceBlockingStub>"]);
}

#[test]
fn test_parse_private_constructor() {
    let defs = parse_java_definitions(&mut java_parser(), GENERATED_GRPC, 0);
    let ctors: Vec<_> = defs.iter().filter(|d| d.kind == DefinitionKind::Constructor).collect();
    assert_eq!(ctors.len(), 1);
    assert_eq!(ctors[0].name, "UserServiceGrpc");
    assert_eq!(ctors[0].parent.as_deref(), Some("com.acme.user.UserServiceGrpc"));
}

#[test]
fn test_method_bodies_are_not_indexed() {
    let defs = parse_java_definitions(&mut java_parser(), GENERATED_GRPC, 0);
    assert!(defs.iter().all(|d| d.name != "asyncUnimplementedUnaryCall"));
    assert!(defs.iter().all(|d| d.name != "blockingUnaryCall"));
}

#[test]
fn test_parse_server_impl_base_and_method() {
    let defs = parse_java_definitions(&mut java_parser(), SERVER_IMPL, 3);

    let class = defs.iter().find(|d| d.kind == DefinitionKind::Class).unwrap();
    assert_eq!(class.name, "UserServiceGrpcService");
    assert_eq!(class.file_id, 3);
    assert_eq!(class.qualified_name, "com.acme.user.server.UserServiceGrpcService");
    assert_eq!(class.base_types, vec!["UserServiceGrpc.UserServiceImplBase"]);

    let method = defs.iter().find(|d| d.name == "getUser").unwrap();
    assert_eq!(method.kind, DefinitionKind::Method);
    // position of the name, not of the leading @Override
    assert_eq!(method.line, 17);
    assert_eq!(method.column, 17);
    let sig = method.signature.as_deref().unwrap();
    assert!(sig.contains("public void getUser(GetUserRequest request, StreamObserver<User> responseObserver)"));
    assert!(!sig.contains('{'));
}

#[test]
fn test_parse_class_name_position() {
    let defs = parse_java_definitions(&mut java_parser(), SERVER_IMPL, 0);
    let class = defs.iter().find(|d| d.kind == DefinitionKind::Class).unwrap();
    assert_eq!(class.line, 8);
    assert_eq!(class.column, 14);
}

#[test]
fn test_parse_interface_extends_and_abstract_method() {
    let source = r#"
package api;

public interface UserApi extends Remote, AutoCloseable {
    User getUser(long id);
}
"#;
    let defs = parse_java_definitions(&mut java_parser(), source, 0);
    let iface = defs.iter().find(|d| d.kind == DefinitionKind::Interface).unwrap();
    assert_eq!(iface.qualified_name, "api.UserApi");
    assert_eq!(iface.base_types, vec!["Remote", "AutoCloseable"]);

    let method = defs.iter().find(|d| d.name == "getUser").unwrap();
    assert_eq!(method.signature.as_deref(), Some("User getUser(long id)"));
}

#[test]
fn test_parse_enum_members_and_record() {
    let source = r#"
enum Status implements Labeled {
    ACTIVE, INACTIVE;

    public String label() { return name(); }
}

record Point(int x, int y) implements Shape {
    double norm() { return Math.sqrt(x * x + y * y); }
}

@interface Audited {}
"#;
    let defs = parse_java_definitions(&mut java_parser(), source, 0);

    let status = defs.iter().find(|d| d.name == "Status").unwrap();
    assert_eq!(status.kind, DefinitionKind::Enum);
    assert_eq!(status.qualified_name, "Status");
    assert_eq!(status.base_types, vec!["Labeled"]);

    let label = defs.iter().find(|d| d.name == "label").unwrap();
    assert_eq!(label.parent.as_deref(), Some("Status"));

    let point = defs.iter().find(|d| d.name == "Point").unwrap();
    assert_eq!(point.kind, DefinitionKind::Record);
    assert_eq!(point.base_types, vec!["Shape"]);
    assert!(defs.iter().any(|d| d.name == "norm" && d.parent.as_deref() == Some("Point")));

    let audited = defs.iter().find(|d| d.name == "Audited").unwrap();
    assert_eq!(audited.kind, DefinitionKind::Annotation);
}

#[test]
fn test_parse_empty_source() {
    let defs = parse_java_definitions(&mut java_parser(), "", 0);
    assert!(defs.is_empty());
}

#[test]
fn test_char_column_counts_chars() {
    let source = "  é x".as_bytes();
    // 'x' starts at byte 5 (é is two bytes), char column 5
    assert_eq!(char_column(source, 5), 5);
    assert_eq!(char_column(b"a\nbc", 3), 2);
}

// ─── Call sites ─────────────────────────────────────────────────────

#[test]
fn test_call_site_on_method_name() {
    // line 7: `        User direct = userServiceStub.getUser(request(id));`
    let call = extract_call_site(&mut java_parser(), CLIENT, 7, 45).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_on_receiver() {
    let call = extract_call_site(&mut java_parser(), CLIENT, 7, 25).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_inside_unqualified_argument_call() {
    // cursor on `request` in `getUser(request(id))`: request() is unqualified,
    // so the enclosing qualified call is used
    let call = extract_call_site(&mut java_parser(), CLIENT, 7, 50).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_through_this_field_access() {
    // line 8: `        User viaThis = this.userServiceStub.getUser(request(id));`
    let call = extract_call_site(&mut java_parser(), CLIENT, 8, 45).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_through_call_chain() {
    // line 9: `... userServiceStub.withDeadlineAfter(3, TimeUnit.SECONDS).getUser(request(id));`
    let line = CLIENT.lines().nth(8).unwrap();
    let col = line.find(".getUser").unwrap() as u32 + 2;
    let call = extract_call_site(&mut java_parser(), CLIENT, 9, col).unwrap();
    assert_eq!(call, CallSite::new("userServiceStub", "getUser"));
}

#[test]
fn test_call_site_unqualified_call_is_none() {
    // line 10: `        log(id);`
    assert!(extract_call_site(&mut java_parser(), CLIENT, 10, 10).is_none());
}

#[test]
fn test_call_site_outside_any_call_is_none() {
    // line 3: class header
    assert!(extract_call_site(&mut java_parser(), CLIENT, 3, 14).is_none());
}

#[test]
fn test_call_site_out_of_range_cursor() {
    assert!(extract_call_site(&mut java_parser(), CLIENT, 0, 1).is_none());
    assert!(extract_call_site(&mut java_parser(), CLIENT, 1, 0).is_none());
    assert!(extract_call_site(&mut java_parser(), CLIENT, 500, 1).is_none());
}
