use super::*;
use codegraph_core::model::NodeKind;

fn extract_source(path: &str, source: &str) -> ExtractionResult {
    RubyExtractor::new().parse_file(path, source.as_bytes()).expect("valid ruby source")
}

#[test]
fn emits_file_and_module_nodes() {
    let result = extract_source("app/models/user.rb", "class User\nend\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::File));
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::Module));
}

#[test]
fn spec_suffix_upgrades_file_kind() {
    let result = extract_source("spec/models/user_spec.rb", "RSpec.describe User do\nend\n");
    assert!(result.nodes.iter().any(|n| n.kind == NodeKind::TestFile));
}

#[test]
fn class_captures_superclass_and_methods() {
    let source = "class UsersController < ApplicationController\n  def index\n  end\n\n  def show\n  end\nend\n";
    let result = extract_source("app/controllers/users_controller.rb", source);
    let controller = result.nodes.iter().find(|n| n.name == "UsersController").unwrap();
    assert_eq!(controller.kind, NodeKind::Class);
    assert_eq!(controller.prop("bases"), Some("ApplicationController"));
    assert_eq!(controller.prop("methods"), Some("index, show"));
}

#[test]
fn superclass_emits_implements_edge() {
    let source = "class UsersController < ApplicationController\nend\n";
    let result = extract_source("app/controllers/users_controller.rb", source);
    let controller = result.nodes.iter().find(|n| n.name == "UsersController").unwrap();
    let base = result.nodes.iter().find(|n| n.name == "ApplicationController").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Implements && e.source == controller.id && e.target == base.id));
}

#[test]
fn require_tracks_dependency() {
    let source = "require 'json'\n\nclass Parser\nend\n";
    let result = extract_source("lib/parser.rb", source);
    let dep = result.nodes.iter().find(|n| n.kind == NodeKind::Dependency).unwrap();
    assert_eq!(dep.name, "json");
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Imports && e.target == dep.id));
}

#[test]
fn rails_route_with_to_action_is_detected() {
    let source = "Rails.application.routes.draw do\n  get '/users', to: 'users#index'\nend\n";
    let result = extract_source("config/routes.rb", source);
    let endpoint = result.nodes.iter().find(|n| n.kind == NodeKind::ApiEndpoint).unwrap();
    assert_eq!(endpoint.prop("http_method"), Some("GET"));
    assert_eq!(endpoint.prop("path"), Some("/users"));
    assert_eq!(endpoint.prop("framework"), Some("rails"));
    assert_eq!(endpoint.prop("action"), Some("users#index"));
}

#[test]
fn sinatra_route_without_to_action_is_detected() {
    let source = "get '/users' do\n  'ok'\nend\n";
    let result = extract_source("app.rb", source);
    let endpoint = result.nodes.iter().find(|n| n.kind == NodeKind::ApiEndpoint).unwrap();
    assert_eq!(endpoint.prop("framework"), Some("sinatra"));
}

#[test]
fn self_method_call_resolves_within_class() {
    let source = "class Service\n  def run\n    self.helper\n  end\n\n  def helper\n  end\nend\n";
    let result = extract_source("app/services/service.rb", source);
    let run = result.nodes.iter().find(|n| n.name == "run").unwrap();
    let helper = result.nodes.iter().find(|n| n.name == "helper").unwrap();
    assert!(result.edges.iter().any(|e| e.kind == EdgeKind::Calls && e.source == run.id && e.target == helper.id));
}

#[test]
fn test_prefix_method_upgrades_inside_spec_file() {
    let source = "class UserTest\n  def test_creates_user\n  end\nend\n";
    let result = extract_source("test/models/user_test.rb", source);
    let method = result.nodes.iter().find(|n| n.name == "test_creates_user").unwrap();
    assert_eq!(method.kind, NodeKind::TestFunction);
}

#[test]
fn httparty_get_call_emits_api_call_dependency() {
    let source = "class Client\n  def load\n    HTTParty.get('/profile')\n  end\nend\n";
    let result = extract_source("app/clients/client.rb", source);
    let dep = result.nodes.iter().find(|n| n.prop("kind") == Some("api_call")).unwrap();
    assert_eq!(dep.prop("framework"), Some("HTTParty"));
    assert_eq!(dep.prop("path"), Some("/profile"));
}
